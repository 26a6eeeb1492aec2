//! Cache backend abstraction.

use async_trait::async_trait;

/// Outcome of a cache read.
///
/// A normal miss and a degraded backend are distinct: on a miss the caller
/// runs its loader and repopulates the entry, while on `Unavailable` the
/// caller still runs the loader but skips the store, so an outage is never
/// masked as a permanently empty cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The key exists and has not expired.
    Hit(String),
    /// The key is absent, expired, or was evicted.
    Miss,
    /// The backend could not be reached (timeout, network error, or no
    /// backend configured).
    Unavailable,
}

impl Lookup {
    /// Returns the cached value for a hit, `None` otherwise.
    #[must_use]
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Unavailable => None,
        }
    }

    /// Whether the backend was reachable for this read.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Key-value store with per-key TTL and an atomic windowed counter.
///
/// Implementations never surface errors to callers: infrastructure failures
/// degrade to [`Lookup::Unavailable`] on reads, are swallowed (and logged) on
/// writes, and yield `None` from [`incr_window`](Self::incr_window). Values
/// are opaque strings, already serialized by the caller.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Reads a key. Never fails for a missing key.
    async fn get(&self, key: &str) -> Lookup;

    /// Writes a key, replacing any existing entry and its TTL.
    ///
    /// `ttl_secs <= 0` is treated as a delete; callers use this as an
    /// invalidation idiom.
    async fn set(&self, key: &str, value: &str, ttl_secs: i64);

    /// Deletes a key. Idempotent; absent keys are not an error.
    async fn delete(&self, key: &str);

    /// Atomically increments a counter inside a fixed window.
    ///
    /// A fresh key is initialized to 1 with a TTL of `window_secs`; an
    /// existing key is incremented without touching its remaining TTL.
    /// Returns the new count, or `None` when the backend is unavailable.
    async fn incr_window(&self, key: &str, window_secs: i64) -> Option<u64>;

    /// Whether this backend has working storage behind it.
    fn is_enabled(&self) -> bool {
        true
    }
}
