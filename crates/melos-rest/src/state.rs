//! Application state for Axum handlers.

use melos_cache::{CacheAside, RateLimiter};
use melos_config::SecurityConfig;
use melos_repository::{CatalogStore, CredentialStore};
use melos_security::TokenProvider;
use std::sync::Arc;

/// Shared application state.
///
/// Handlers reach the relational stores only through [`CacheAside`] reads
/// and the store traits; the raw cache backend is not exposed here.
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheAside,
    pub limiter: RateLimiter,
    pub credentials: Arc<dyn CredentialStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub token_provider: Arc<TokenProvider>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(
        cache: CacheAside,
        limiter: RateLimiter,
        credentials: Arc<dyn CredentialStore>,
        catalog: Arc<dyn CatalogStore>,
        token_provider: Arc<TokenProvider>,
        security: Arc<SecurityConfig>,
    ) -> Self {
        Self {
            cache,
            limiter,
            credentials,
            catalog,
            token_provider,
            security,
        }
    }
}
