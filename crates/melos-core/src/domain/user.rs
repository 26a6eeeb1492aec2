//! User records for session-token endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record, read by primary key for "my data" endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Clearance level baked into the user's session tokens.
    pub clearance: i64,
    pub created_at: DateTime<Utc>,
}
