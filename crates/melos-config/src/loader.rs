//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use melos_core::MelosError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Loads configuration from the default location (`./config`).
pub fn from_default_location() -> Result<AppConfig, MelosError> {
    load("./config")
}

/// Loads configuration from the specified directory.
///
/// Sources are layered in order:
/// 1. `config/default.toml` - Default values
/// 2. `config/{environment}.toml` - Environment-specific overrides
/// 3. `config/local.toml` - Local overrides (not committed)
/// 4. Environment variables with `MELOS_` prefix
pub fn load(config_dir: &str) -> Result<AppConfig, MelosError> {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file found or error loading it: {}", e);
    }

    let environment =
        std::env::var("MELOS_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    let default_path = format!("{}/default.toml", config_dir);
    if Path::new(&default_path).exists() {
        debug!("Loading default config from: {}", default_path);
        builder = builder.add_source(File::with_name(&default_path).required(false));
    }

    let env_path = format!("{}/{}.toml", config_dir, environment);
    if Path::new(&env_path).exists() {
        debug!("Loading environment config from: {}", env_path);
        builder = builder.add_source(File::with_name(&env_path).required(false));
    }

    let local_path = format!("{}/local.toml", config_dir);
    if Path::new(&local_path).exists() {
        debug!("Loading local config from: {}", local_path);
        builder = builder.add_source(File::with_name(&local_path).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("MELOS")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build().map_err(config_error)?;

    let app_config: AppConfig = config.try_deserialize().map_err(config_error)?;

    validate(&app_config)?;

    Ok(app_config)
}

/// Validates the configuration.
fn validate(config: &AppConfig) -> Result<(), MelosError> {
    if config.app.environment == "production"
        && config.security.jwt_secret == "change-me-in-production"
    {
        warn!("Using default JWT secret in production! This is a security risk.");
    }

    if config.security.master_key.is_none() {
        warn!("No master key configured; all writes will be rejected");
    }

    if config.database.url.is_empty() {
        return Err(MelosError::Configuration(
            "Database URL is required".to_string(),
        ));
    }

    // Redis being absent is a valid degraded state, but a half-configured
    // endpoint is an operator mistake worth surfacing.
    if config.redis.enabled && config.redis.url.is_none() {
        warn!("Redis enabled but no URL configured; falling back to in-process cache");
    }

    Ok(())
}

fn config_error(err: ConfigError) -> MelosError {
    MelosError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = AppConfig::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_database_url_rejected() {
        let mut config = AppConfig::default();
        config.database.url = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_load_missing_dir_uses_defaults() {
        // No config directory and no MELOS_ vars: structure defaults apply.
        let config = load("./does-not-exist");
        // The config crate yields an empty tree here; deserialization falls
        // back to the serde defaults on AppConfig.
        if let Ok(config) = config {
            assert_eq!(config.server.port, 8080);
        }
    }
}
