//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Redis (shared remote cache) configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache sizing and TTL policy.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Credential and token configuration.
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "melos-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL.
    pub url: String,
    /// Maximum connection pool size.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds.
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://melos.db".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl DatabaseConfig {
    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the idle timeout as a Duration.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Redis configuration.
///
/// A missing URL or `enabled = false` is a valid, detected state: the server
/// falls back to the in-process cache and rate limiting fails open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL. `None` means no shared cache is attached.
    pub url: Option<String>,
    /// Connection pool size.
    pub pool_size: u32,
    /// Enable Redis (can be disabled for local development).
    pub enabled: bool,
    /// Hard timeout for any single Redis call, in milliseconds.
    pub op_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 10,
            enabled: false,
            op_timeout_ms: 2000,
        }
    }
}

impl RedisConfig {
    /// Whether a usable Redis endpoint is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.enabled && self.url.is_some()
    }

    /// Returns the per-operation timeout as a Duration.
    #[must_use]
    pub const fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

/// Cache sizing and TTL policy, overridable per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry capacity of the in-process cache.
    pub capacity: usize,
    /// Default TTL applied when a caller does not override it, in seconds.
    pub default_ttl_secs: i64,
    /// TTL for resource list entries.
    pub list_ttl_secs: i64,
    /// TTL for single-item entries.
    pub item_ttl_secs: i64,
    /// TTL for highly dynamic aggregates (search, daily random).
    pub volatile_ttl_secs: i64,
    /// TTL for cached scoped API-key records. Bounds revocation staleness.
    pub api_key_ttl_secs: i64,
    /// TTL for lyric sheets.
    pub lyrics_ttl_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            default_ttl_secs: 86_400,
            list_ttl_secs: 2_700,
            item_ttl_secs: 3_600,
            volatile_ttl_secs: 60,
            api_key_ttl_secs: 300,
            lyrics_ttl_secs: 86_400,
        }
    }
}

/// Credential and token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Master credential granting full access. `None` disables the master
    /// path entirely.
    pub master_key: Option<String>,
    /// JWT secret key for session tokens.
    pub jwt_secret: String,
    /// JWT expiration in seconds.
    pub jwt_expiration_secs: u64,
    /// JWT issuer.
    pub jwt_issuer: String,
    /// JWT audience.
    pub jwt_audience: String,
    /// Rate window length in seconds.
    pub rate_window_secs: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            master_key: None,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            jwt_issuer: "melos-api".to_string(),
            jwt_audience: "melos-clients".to_string(),
            rate_window_secs: 60,
        }
    }
}

impl SecurityConfig {
    /// Returns the token expiration as a Duration.
    #[must_use]
    pub const fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }
}
