//! API-key credential records and the clearance attached to a request.

use serde::{Deserialize, Serialize};

/// Default per-key request budget per rate window.
pub const DEFAULT_RATE_LIMIT: i64 = 100;

/// Clearance level granted to the master credential.
pub const MASTER_CLEARANCE: i64 = 100;

/// A scoped API key as stored by the credential store.
///
/// Created and rotated on an administrative path outside this service; read
/// on every non-master request and cached briefly, so a revoked key stays
/// usable for at most one cache TTL window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyRecord {
    /// Primary key of the credential row.
    pub id: String,
    /// Requests allowed per rate window.
    pub rate_limit: i64,
    /// Clearance level consulted by downstream handlers.
    pub clearance: i64,
    /// Whether the key is currently active.
    pub is_active: bool,
}

impl ApiKeyRecord {
    /// Effective rate limit, substituting the default for non-positive values.
    #[must_use]
    pub fn effective_rate_limit(&self) -> i64 {
        if self.rate_limit > 0 {
            self.rate_limit
        } else {
            DEFAULT_RATE_LIMIT
        }
    }
}

/// How a request was authorized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// The configured master credential.
    Master,
    /// A scoped API key from the credential store.
    ApiKey,
    /// A session token (JWT) on a user-scoped endpoint.
    Session,
}

/// Authorization level attached to the request context by the gate.
///
/// Downstream handlers consult this to permit or deny field- and row-level
/// operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Clearance {
    /// Integer clearance level.
    pub level: i64,
    /// Credential type that produced this clearance.
    pub source: CredentialSource,
    /// Credential store id of the key, when a scoped key was used.
    pub key_id: Option<String>,
}

impl Clearance {
    /// Full-access clearance for the master credential.
    #[must_use]
    pub fn master() -> Self {
        Self {
            level: MASTER_CLEARANCE,
            source: CredentialSource::Master,
            key_id: None,
        }
    }

    /// Clearance resolved from a scoped API key.
    #[must_use]
    pub fn scoped(record: &ApiKeyRecord) -> Self {
        Self {
            level: record.clearance,
            source: CredentialSource::ApiKey,
            key_id: Some(record.id.clone()),
        }
    }

    /// Clearance granted by a validated session token.
    #[must_use]
    pub fn session(level: i64) -> Self {
        Self {
            level,
            source: CredentialSource::Session,
            key_id: None,
        }
    }

    /// Whether this clearance came from the master credential.
    #[must_use]
    pub const fn is_master(&self) -> bool {
        matches!(self.source, CredentialSource::Master)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rate_limit: i64) -> ApiKeyRecord {
        ApiKeyRecord {
            id: "key-1".to_string(),
            rate_limit,
            clearance: 10,
            is_active: true,
        }
    }

    #[test]
    fn test_effective_rate_limit_default() {
        assert_eq!(record(0).effective_rate_limit(), DEFAULT_RATE_LIMIT);
        assert_eq!(record(-5).effective_rate_limit(), DEFAULT_RATE_LIMIT);
        assert_eq!(record(25).effective_rate_limit(), 25);
    }

    #[test]
    fn test_master_clearance() {
        let c = Clearance::master();
        assert!(c.is_master());
        assert_eq!(c.level, MASTER_CLEARANCE);
        assert!(c.key_id.is_none());
    }

    #[test]
    fn test_scoped_clearance_carries_key_id() {
        let c = Clearance::scoped(&record(50));
        assert!(!c.is_master());
        assert_eq!(c.level, 10);
        assert_eq!(c.key_id.as_deref(), Some("key-1"));
    }
}
