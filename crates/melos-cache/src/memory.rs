//! In-process bounded cache backend.

use crate::backend::{CacheBackend, Lookup};
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default entry capacity.
pub const DEFAULT_CAPACITY: usize = 500;

/// Default TTL for callers that do not pick their own (24 hours).
pub const DEFAULT_TTL_SECS: i64 = 86_400;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Bounded in-process cache with least-recently-used eviction.
///
/// All operations take the mutex for the duration of a single map mutation
/// and never across an await point. Eviction is silent: an evicted entry
/// simply reads as a miss.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Entry>>,
}

impl MemoryCache {
    /// Creates a cache bounded to `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity =
            NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap());
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Current number of live entries, counting expired ones not yet reaped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Lookup {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.is_expired(now) => true,
            Some(entry) => return Lookup::Hit(entry.value.clone()),
            None => return Lookup::Miss,
        };
        if expired {
            entries.pop(key);
        }
        Lookup::Miss
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: i64) {
        let mut entries = self.entries.lock();
        if ttl_secs <= 0 {
            entries.pop(key);
            return;
        }
        entries.put(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs as u64),
            },
        );
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().pop(key);
    }

    async fn incr_window(&self, key: &str, window_secs: i64) -> Option<u64> {
        let now = Instant::now();
        let window = Duration::from_secs(window_secs.max(1) as u64);
        let mut entries = self.entries.lock();

        let existing = entries
            .get(key)
            .map(|entry| (entry.value.clone(), entry.expires_at));

        let count = match existing {
            Some((value, expires_at)) if now < expires_at => {
                let count = value.parse::<u64>().unwrap_or(0) + 1;
                // Preserve the remaining window rather than restarting it.
                entries.put(
                    key.to_string(),
                    Entry {
                        value: count.to_string(),
                        expires_at,
                    },
                );
                count
            }
            _ => {
                entries.put(
                    key.to_string(),
                    Entry {
                        value: "1".to_string(),
                        expires_at: now + window,
                    },
                );
                1
            }
        };

        debug!(key, count, "memory cache counter incremented");
        Some(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_set_get_round_trip() {
        let cache = MemoryCache::default();
        cache.set("cache:tracks:list", "[1,2,3]", 60).await;
        assert_eq!(
            cache.get("cache:tracks:list").await,
            Lookup::Hit("[1,2,3]".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_miss() {
        let cache = MemoryCache::default();
        assert_eq!(cache.get("cache:tracks:list").await, Lookup::Miss);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_miss() {
        let cache = MemoryCache::default();
        cache.set("k", "v", 60).await;
        cache.delete("k").await;
        assert_eq!(cache.get("k").await, Lookup::Miss);
    }

    #[tokio::test]
    async fn test_delete_absent_is_idempotent() {
        let cache = MemoryCache::default();
        cache.delete("never-set").await;
        cache.delete("never-set").await;
    }

    #[tokio::test]
    async fn test_zero_ttl_acts_as_delete() {
        let cache = MemoryCache::default();
        cache.set("k", "v", 60).await;
        cache.set("k", "ignored", 0).await;
        assert_eq!(cache.get("k").await, Lookup::Miss);

        cache.set("k", "v", 60).await;
        cache.set("k", "ignored", -5).await;
        assert_eq!(cache.get("k").await, Lookup::Miss);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value_and_ttl() {
        let cache = MemoryCache::default();
        cache.set("k", "old", 60).await;
        cache.set("k", "new", 120).await;
        assert_eq!(cache.get("k").await, Lookup::Hit("new".to_string()));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_miss() {
        let cache = MemoryCache::default();
        cache.set("k", "v", 1).await;
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(cache.get("k").await, Lookup::Miss);
    }

    #[tokio::test]
    async fn test_eviction_reads_as_miss() {
        let cache = MemoryCache::new(2);
        cache.set("a", "1", 60).await;
        cache.set("b", "2", 60).await;
        cache.set("c", "3", 60).await;
        // "a" was least recently used and silently evicted.
        assert_eq!(cache.get("a").await, Lookup::Miss);
        assert_eq!(cache.get("b").await, Lookup::Hit("2".to_string()));
        assert_eq!(cache.get("c").await, Lookup::Hit("3".to_string()));
    }

    #[tokio::test]
    async fn test_incr_window_counts_up() {
        let cache = MemoryCache::default();
        assert_eq!(cache.incr_window("ratelimit:k", 60).await, Some(1));
        assert_eq!(cache.incr_window("ratelimit:k", 60).await, Some(2));
        assert_eq!(cache.incr_window("ratelimit:k", 60).await, Some(3));
    }

    #[tokio::test]
    async fn test_concurrent_incr_loses_no_updates() {
        let cache = Arc::new(MemoryCache::default());
        let mut handles = Vec::new();
        for _ in 0..64 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache.incr_window("ratelimit:burst", 60).await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cache.incr_window("ratelimit:burst", 60).await, Some(65));
    }
}
