//! Cache-aside accessor: read-through reads, explicit invalidation on writes.

use crate::backend::{CacheBackend, Lookup};
use crate::keys;
use crate::memory::DEFAULT_TTL_SECS;
use melos_config::CacheConfig;
use melos_core::MelosResult;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-resource TTL policy in seconds.
#[derive(Debug, Clone)]
pub struct TtlPolicy {
    /// List queries.
    pub list: i64,
    /// Single-item queries.
    pub item: i64,
    /// Highly dynamic aggregates (search results, daily selections).
    pub volatile: i64,
    /// Scoped API-key records; bounds how long a revoked key stays usable.
    pub api_key: i64,
    /// Lyric sheets.
    pub lyrics: i64,
    /// Fallback when nothing more specific applies.
    pub default: i64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            list: 2_700,
            item: 3_600,
            volatile: 60,
            api_key: 300,
            lyrics: DEFAULT_TTL_SECS,
            default: DEFAULT_TTL_SECS,
        }
    }
}

impl From<&CacheConfig> for TtlPolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            list: config.list_ttl_secs,
            item: config.item_ttl_secs,
            volatile: config.volatile_ttl_secs,
            api_key: config.api_key_ttl_secs,
            lyrics: config.lyrics_ttl_secs,
            default: config.default_ttl_secs,
        }
    }
}

/// Read-through cache accessor.
///
/// Owns key naming and TTL policy. Handlers consult this before the
/// relational store and call the invalidation methods after every
/// create/update/delete; they never reach the backend directly.
#[derive(Clone)]
pub struct CacheAside {
    backend: Arc<dyn CacheBackend>,
    ttl: TtlPolicy,
}

impl CacheAside {
    /// Creates an accessor over a backend with the given TTL policy.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: TtlPolicy) -> Self {
        Self { backend, ttl }
    }

    /// The TTL policy in effect.
    #[must_use]
    pub fn ttl(&self) -> &TtlPolicy {
        &self.ttl
    }

    /// The backend behind this accessor, for components that share it
    /// (the rate limiter).
    #[must_use]
    pub fn backend(&self) -> Arc<dyn CacheBackend> {
        Arc::clone(&self.backend)
    }

    /// Reads `key`, falling back to `loader` on a miss and repopulating the
    /// entry with `ttl_secs`.
    ///
    /// Loader failures propagate uncached. When the backend is unavailable
    /// the loader still runs but the store is skipped, so an outage is not
    /// frozen into the cache as emptiness. A cached entry that fails to
    /// deserialize is treated as a miss and overwritten.
    pub async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        ttl_secs: i64,
        loader: F,
    ) -> MelosResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = MelosResult<T>> + Send,
    {
        let lookup = self.backend.get(key).await;

        if let Lookup::Hit(json) = &lookup {
            match serde_json::from_str::<T>(json) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("Discarding corrupt cache entry '{}': {}", key, e);
                }
            }
        }

        let value = loader().await?;

        if lookup.is_unavailable() {
            debug!("Cache unavailable; skipping store for '{}'", key);
            return Ok(value);
        }

        match serde_json::to_string(&value) {
            Ok(json) => self.backend.set(key, &json, ttl_secs).await,
            Err(e) => warn!("Failed to serialize value for '{}': {}", key, e),
        }

        Ok(value)
    }

    /// Clears the canonical list key for a resource.
    pub async fn invalidate(&self, resource: &str) {
        let key = keys::list(resource);
        debug!("Invalidating '{}'", key);
        self.backend.delete(&key).await;
    }

    /// Clears both the item key and the list key for a resource.
    ///
    /// Two independent single-key deletes, deliberately not atomic: a crash
    /// between them leaves one entry stale until its TTL expires.
    pub async fn invalidate_item(&self, resource: &str, id: &str) {
        self.backend.delete(&keys::item(resource, id)).await;
        self.invalidate(resource).await;
    }

    /// Clears one fully-qualified key (derived keys such as lyric variants).
    pub async fn invalidate_exact(&self, key: &str) {
        debug!("Invalidating '{}'", key);
        self.backend.delete(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCache;
    use crate::redis::RedisCache;
    use melos_core::MelosError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn accessor() -> CacheAside {
        CacheAside::new(Arc::new(MemoryCache::default()), TtlPolicy::default())
    }

    #[tokio::test]
    async fn test_read_through_populates_and_reuses() {
        let cache = accessor();
        let calls = AtomicUsize::new(0);

        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, MelosError>(vec!["a".to_string(), "b".to_string()])
        };

        let first: Vec<String> = cache
            .read_through(&keys::list("tracks"), 60, load)
            .await
            .unwrap();
        assert_eq!(first, vec!["a", "b"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second: Vec<String> = cache
            .read_through(&keys::list("tracks"), 60, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["stale".to_string()])
            })
            .await
            .unwrap();
        // Served from cache; the second loader never ran.
        assert_eq!(second, vec!["a", "b"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loader_errors_are_not_cached() {
        let cache = accessor();

        let result: MelosResult<Vec<String>> = cache
            .read_through(&keys::list("tracks"), 60, || async {
                Err(MelosError::Database("store down".to_string()))
            })
            .await;
        assert!(result.is_err());

        // The failure left nothing behind: the next read runs its loader.
        let value: Vec<String> = cache
            .read_through(&keys::list("tracks"), 60, || async {
                Ok(vec!["fresh".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(value, vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_invalidate_clears_list_key() {
        let cache = accessor();
        let calls = AtomicUsize::new(0);

        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, MelosError>(42u64)
        };
        let _: u64 = cache.read_through(&keys::list("x"), 60, load).await.unwrap();

        cache.invalidate("x").await;

        let _: u64 = cache
            .read_through(&keys::list("x"), 60, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(43u64)
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_item_clears_both_keys() {
        let cache = accessor();
        let backend = cache.backend();

        backend.set(&keys::item("tracks", "7"), "\"item\"", 60).await;
        backend.set(&keys::list("tracks"), "\"list\"", 60).await;

        cache.invalidate_item("tracks", "7").await;

        assert_eq!(backend.get(&keys::item("tracks", "7")).await, Lookup::Miss);
        assert_eq!(backend.get(&keys::list("tracks")).await, Lookup::Miss);
    }

    #[tokio::test]
    async fn test_corrupt_entry_treated_as_miss() {
        let cache = accessor();
        let backend = cache.backend();
        backend.set(&keys::item("tracks", "7"), "not json {", 60).await;

        let value: u64 = cache
            .read_through(&keys::item("tracks", "7"), 60, || async { Ok(7u64) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        // The corrupt entry was overwritten with the fresh value.
        assert_eq!(
            backend.get(&keys::item("tracks", "7")).await,
            Lookup::Hit("7".to_string())
        );
    }

    #[tokio::test]
    async fn test_unavailable_backend_runs_loader_without_store() {
        let cache = CacheAside::new(Arc::new(RedisCache::disabled()), TtlPolicy::default());
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: u64 = cache
                .read_through(&keys::list("tracks"), 60, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(9u64)
                })
                .await
                .unwrap();
            assert_eq!(value, 9);
        }
        // Every read went to the loader; nothing was stored.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
