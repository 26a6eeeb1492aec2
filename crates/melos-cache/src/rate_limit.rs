//! Fixed-window rate limiter on top of the cache backend's counter.

use crate::backend::CacheBackend;
use crate::keys;
use std::sync::Arc;
use tracing::debug;

/// Fixed-window request counter per caller identity.
///
/// Windows are discrete, not sliding: a burst straddling a window boundary
/// can admit up to twice the limit. When the backend is unavailable the
/// limiter reports "not limited" (fail-open); API availability wins over
/// strict quota enforcement.
#[derive(Clone)]
pub struct RateLimiter {
    backend: Arc<dyn CacheBackend>,
}

impl RateLimiter {
    /// Creates a limiter over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Counts one request for `identity` and reports whether it exceeded
    /// `limit` within the current window.
    ///
    /// The increment happens before the comparison, so even an ultimately
    /// allowed request consumes budget.
    pub async fn is_limited(&self, identity: &str, limit: i64, window_secs: i64) -> bool {
        if limit <= 0 {
            return false;
        }

        let key = keys::rate_limit(identity);
        match self.backend.incr_window(&key, window_secs).await {
            Some(count) => {
                let limited = count > limit as u64;
                if limited {
                    debug!(identity, count, limit, "rate limit exceeded");
                }
                limited
            }
            None => {
                // Backend down or absent: allow the request.
                debug!(identity, "rate limiter backend unavailable; failing open");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCache;
    use crate::redis::RedisCache;

    fn limiter() -> RateLimiter {
        RateLimiter::new(Arc::new(MemoryCache::default()))
    }

    #[tokio::test]
    async fn test_limit_boundary() {
        let limiter = limiter();
        for _ in 0..5 {
            assert!(!limiter.is_limited("S1", 5, 60).await);
        }
        assert!(limiter.is_limited("S1", 5, 60).await);
        assert!(limiter.is_limited("S1", 5, 60).await);
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let limiter = limiter();
        for _ in 0..3 {
            assert!(!limiter.is_limited("a", 2, 60).await);
            let _ = limiter.is_limited("a", 2, 60).await;
        }
        assert!(!limiter.is_limited("b", 2, 60).await);
    }

    #[tokio::test]
    async fn test_window_reset() {
        let limiter = limiter();
        assert!(!limiter.is_limited("S1", 1, 1).await);
        assert!(limiter.is_limited("S1", 1, 1).await);

        std::thread::sleep(std::time::Duration::from_millis(1100));

        // Window elapsed: the counter restarted.
        assert!(!limiter.is_limited("S1", 1, 1).await);
    }

    #[tokio::test]
    async fn test_fail_open_without_backend() {
        let limiter = RateLimiter::new(Arc::new(RedisCache::disabled()));
        for _ in 0..20 {
            assert!(!limiter.is_limited("S1", 2, 60).await);
        }
    }

    #[tokio::test]
    async fn test_non_positive_limit_never_blocks() {
        let limiter = limiter();
        assert!(!limiter.is_limited("S1", 0, 60).await);
        assert!(!limiter.is_limited("S1", -1, 60).await);
    }
}
