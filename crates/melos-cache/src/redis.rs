//! Redis-backed shared cache backend.

use crate::backend::{CacheBackend, Lookup};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Hard ceiling on any single Redis round trip.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Network-attached cache shared across process instances.
///
/// Constructed [`disabled`](Self::disabled) when no endpoint is configured;
/// in that state every read is `Unavailable` and counters always report
/// `None`, which callers treat as "skip caching" and "not limited". Network
/// failures and timeouts degrade the same way and are never surfaced.
pub struct RedisCache {
    pool: Option<Arc<Pool>>,
    op_timeout: Duration,
}

impl RedisCache {
    /// Creates a Redis cache over an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self {
            pool: Some(pool),
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    /// Creates a Redis cache with a custom per-operation timeout.
    #[must_use]
    pub fn with_timeout(pool: Arc<Pool>, op_timeout: Duration) -> Self {
        Self {
            pool: Some(pool),
            op_timeout,
        }
    }

    /// Creates the detached variant used when no endpoint is configured.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }

    async fn conn(&self) -> Option<deadpool_redis::Connection> {
        let pool = self.pool.as_ref()?;
        match timeout(self.op_timeout, pool.get()).await {
            Ok(Ok(conn)) => Some(conn),
            Ok(Err(e)) => {
                warn!("Failed to get Redis connection: {}", e);
                None
            }
            Err(_) => {
                warn!("Timed out acquiring Redis connection");
                None
            }
        }
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get(&self, key: &str) -> Lookup {
        let Some(mut conn) = self.conn().await else {
            return Lookup::Unavailable;
        };

        match timeout(self.op_timeout, conn.get::<_, Option<String>>(key)).await {
            Ok(Ok(Some(value))) => {
                debug!("Cache hit for key '{}'", key);
                Lookup::Hit(value)
            }
            Ok(Ok(None)) => {
                debug!("Cache miss for key '{}'", key);
                Lookup::Miss
            }
            Ok(Err(e)) => {
                warn!("Redis GET failed for key '{}': {}", key, e);
                Lookup::Unavailable
            }
            Err(_) => {
                warn!("Redis GET timed out for key '{}'", key);
                Lookup::Unavailable
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: i64) {
        if ttl_secs <= 0 {
            self.delete(key).await;
            return;
        }

        let Some(mut conn) = self.conn().await else {
            return;
        };

        match timeout(
            self.op_timeout,
            conn.set_ex::<_, _, ()>(key, value, ttl_secs as u64),
        )
        .await
        {
            Ok(Ok(())) => debug!("Cached key '{}' with TTL {}s", key, ttl_secs),
            Ok(Err(e)) => warn!("Redis SET failed for key '{}': {}", key, e),
            Err(_) => warn!("Redis SET timed out for key '{}'", key),
        }
    }

    async fn delete(&self, key: &str) {
        let Some(mut conn) = self.conn().await else {
            return;
        };

        match timeout(self.op_timeout, conn.del::<_, i64>(key)).await {
            Ok(Ok(deleted)) => debug!("Deleted key '{}': {}", key, deleted > 0),
            Ok(Err(e)) => warn!("Redis DEL failed for key '{}': {}", key, e),
            Err(_) => warn!("Redis DEL timed out for key '{}'", key),
        }
    }

    async fn incr_window(&self, key: &str, window_secs: i64) -> Option<u64> {
        let Some(mut conn) = self.conn().await else {
            return None;
        };

        let op = async {
            let count: u64 = conn.incr(key, 1u64).await?;
            // A fresh counter carries no TTL yet; attach the window exactly
            // once so later increments run inside the same fixed window.
            if count == 1 {
                conn.expire::<_, ()>(key, window_secs.max(1)).await?;
            }
            Ok::<u64, deadpool_redis::redis::RedisError>(count)
        };

        match timeout(self.op_timeout, op).await {
            Ok(Ok(count)) => Some(count),
            Ok(Err(e)) => {
                warn!("Redis INCR failed for key '{}': {}", key, e);
                None
            }
            Err(_) => {
                warn!("Redis INCR timed out for key '{}'", key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_is_unavailable() {
        let cache = RedisCache::disabled();
        assert!(!cache.is_enabled());
        assert_eq!(cache.get("cache:tracks:list").await, Lookup::Unavailable);
    }

    #[tokio::test]
    async fn test_disabled_counter_fails_open() {
        let cache = RedisCache::disabled();
        for _ in 0..10 {
            assert_eq!(cache.incr_window("ratelimit:k", 60).await, None);
        }
    }

    #[tokio::test]
    async fn test_disabled_writes_are_noops() {
        let cache = RedisCache::disabled();
        cache.set("k", "v", 60).await;
        cache.delete("k").await;
        assert_eq!(cache.get("k").await, Lookup::Unavailable);
    }
}
