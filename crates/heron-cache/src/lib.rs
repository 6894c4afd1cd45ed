//! Response caching for Heron.
//!
//! Routes declared with a cache policy go through the [`CacheGate`]: the
//! first request computes the response and stores it under a key derived from
//! the matched path and its path parameters; later identical requests within
//! the TTL are answered from the store without invoking the handler.
//!
//! The gate talks to a [`CacheStore`], injected at construction. Two stores
//! ship with the crate:
//!
//! - [`InMemoryStore`], process-local, the default;
//! - `RedisStore`, shared across worker processes (feature `redis`).
//!
//! Concurrent misses on the same key may both run the handler and both write
//! the store; the last write wins. There is no invalidation beyond the TTL.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod gate;
#[cfg(feature = "redis")]
mod redis_store;
mod store;

pub use error::CacheError;
pub use gate::{cache_control, cache_key, CacheGate, CacheStatus, CachedResponse, CACHE_STATUS_HEADER};
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use store::{CacheStore, InMemoryStore, SWEEP_INTERVAL};
