//! # Melos Server
//!
//! Main entry point for the Melos music catalog API. Loads configuration,
//! wires the cache backend (Redis when configured, in-process otherwise),
//! the stores, and the REST router, then serves until SIGINT/SIGTERM.

use melos_cache::{CacheAside, CacheBackend, MemoryCache, RateLimiter, RedisCache, TtlPolicy};
use melos_config::AppConfig;
use melos_core::{MelosError, MelosResult};
use melos_repository::{create_pool, SqliteCatalogStore, SqliteCredentialStore};
use melos_rest::{create_router, AppState};
use melos_security::TokenProvider;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    init_logging();

    info!("Starting Melos API server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> MelosResult<()> {
    let config = melos_config::from_default_location()?;

    info!("Environment: {}", config.app.environment);

    let db_pool = create_pool(&config.database).await?;
    db_pool.run_migrations().await?;

    let backend = build_cache_backend(&config);
    let cache = CacheAside::new(Arc::clone(&backend), TtlPolicy::from(&config.cache));
    // The limiter shares the accessor's backend, so without Redis it fails
    // open alongside the cache.
    let limiter = RateLimiter::new(backend);

    let security = Arc::new(config.security.clone());
    let token_provider = Arc::new(TokenProvider::new(Arc::clone(&security)));

    let state = AppState::new(
        cache,
        limiter,
        Arc::new(SqliteCredentialStore::new(Arc::clone(&db_pool))),
        Arc::new(SqliteCatalogStore::new(Arc::clone(&db_pool))),
        token_provider,
        security,
    );

    let router = create_router(state, &config.server);

    let addr = config.server.addr();
    info!("Starting REST server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MelosError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MelosError::Internal(format!("Server error: {}", e)))?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Builds the cache backend from configuration.
///
/// A configured Redis endpoint yields the shared backend; anything else,
/// including a pool that fails to construct, falls back to the in-process
/// bounded cache.
fn build_cache_backend(config: &AppConfig) -> Arc<dyn CacheBackend> {
    if config.redis.is_configured() {
        if let Some(url) = &config.redis.url {
            let mut redis_config = deadpool_redis::Config::from_url(url.clone());
            redis_config.pool = Some(deadpool_redis::PoolConfig::new(
                config.redis.pool_size as usize,
            ));

            match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
                Ok(pool) => {
                    info!("Using Redis cache backend");
                    return Arc::new(RedisCache::with_timeout(
                        Arc::new(pool),
                        config.redis.op_timeout(),
                    ));
                }
                Err(e) => {
                    warn!("Failed to create Redis pool, using in-process cache: {}", e);
                }
            }
        }
    }

    info!(
        "Using in-process cache backend (capacity {})",
        config.cache.capacity
    );
    Arc::new(MemoryCache::new(config.cache.capacity))
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,melos=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
