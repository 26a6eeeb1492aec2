//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,

    /// Username.
    pub username: String,

    /// Clearance level baked in at login time.
    pub clearance: i64,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID.
    pub jti: String,
}

impl Claims {
    /// Creates session claims for a user.
    #[must_use]
    pub fn new(
        user_id: String,
        username: String,
        clearance: i64,
        issuer: String,
        audience: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username,
            clearance,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer,
            aud: audience,
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// The user ID this token was issued for.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Checks if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fresh_claims_not_expired() {
        let claims = Claims::new(
            "u-1".to_string(),
            "listener".to_string(),
            0,
            "issuer".to_string(),
            "audience".to_string(),
            Utc::now() + Duration::hours(1),
        );
        assert!(!claims.is_expired());
        assert_eq!(claims.user_id(), "u-1");
    }
}
