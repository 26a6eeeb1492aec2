//! # Melos Cache
//!
//! The caching core of the Melos API: a backend abstraction with an
//! in-process bounded implementation and a Redis implementation, the
//! cache-aside accessor with its key-naming and TTL discipline, and the
//! fixed-window rate limiter built on the backend's counter primitive.
//!
//! Handlers go through [`CacheAside`] and [`RateLimiter`]; nothing outside
//! this crate touches a [`CacheBackend`] directly.

pub mod accessor;
pub mod backend;
pub mod keys;
pub mod memory;
pub mod rate_limit;
pub mod redis;

pub use accessor::{CacheAside, TtlPolicy};
pub use backend::{CacheBackend, Lookup};
pub use memory::MemoryCache;
pub use rate_limit::RateLimiter;
pub use redis::RedisCache;
