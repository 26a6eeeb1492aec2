//! SQLite credential store implementation.

use crate::pool::DatabasePool;
use crate::traits::CredentialStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use melos_core::{ApiKeyRecord, MelosResult, User};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// SQLite-backed credential lookups.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: Arc<DatabasePool>,
}

impl SqliteCredentialStore {
    /// Creates a new credential store over the shared pool.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ApiKeyRow {
    id: String,
    rate_limit: i64,
    clearance: i64,
    is_active: bool,
}

impl From<ApiKeyRow> for ApiKeyRecord {
    fn from(row: ApiKeyRow) -> Self {
        Self {
            id: row.id,
            rate_limit: row.rate_limit,
            clearance: row.clearance,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    clearance: i64,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            clearance: row.clearance,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_api_key(&self, key_hash: &str) -> MelosResult<Option<ApiKeyRecord>> {
        debug!("Credential store lookup for API key");

        let row: Option<ApiKeyRow> = sqlx::query_as(
            "SELECT id, rate_limit, clearance, is_active \
             FROM api_keys WHERE key_hash = ? AND is_active = 1",
        )
        .bind(key_hash)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(ApiKeyRecord::from))
    }

    async fn find_user(&self, id: &str) -> MelosResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, email, clearance, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }
}
