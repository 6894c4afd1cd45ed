//! The cache gate.
//!
//! Sits between authentication and handler invocation for routes that carry a
//! cache policy. A hit short-circuits the handler; a miss lets the handler run
//! and then primes the store. Store failures never fail the request.

use std::sync::Arc;

use bytes::Bytes;
use heron_router::{Params, RouteDefinition};

use crate::store::CacheStore;

/// Header marking whether a response came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Derives the cache key for a request.
///
/// The key is the matched request path, a colon, and the path parameters as
/// a JSON object with sorted keys. Headers and body are not part of the key.
///
/// ```rust
/// use heron_cache::cache_key;
/// use heron_router::Params;
///
/// let mut params = Params::new();
/// params.push("year", "2024");
/// params.push("month", "05");
/// assert_eq!(
///     cache_key("/reports/2024/05", &params),
///     r#"/reports/2024/05:{"month":"05","year":"2024"}"#
/// );
/// ```
#[must_use]
pub fn cache_key(path: &str, params: &Params) -> String {
    format!("{path}:{}", params.to_canonical_json())
}

/// Whether a response was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the store.
    Hit,
    /// Computed by the handler.
    Miss,
}

impl CacheStatus {
    /// Returns the `X-Cache` header value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// Formats the `Cache-Control` value for a TTL.
#[must_use]
pub fn cache_control(ttl_secs: u64) -> String {
    format!("public, max-age={ttl_secs}")
}

/// A response body found in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// The stored JSON, byte for byte as the handler produced it.
    pub body: Bytes,
    /// TTL of the route that produced the hit.
    pub ttl_secs: u64,
}

/// Looks up and primes cached responses through an injected store.
#[derive(Clone)]
pub struct CacheGate {
    store: Arc<dyn CacheStore>,
}

impl CacheGate {
    /// Creates a gate over `store`.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Looks up a cached response for `route`.
    ///
    /// Returns `None` for routes without a cache policy, on a miss, and when
    /// the store fails.
    pub async fn lookup(
        &self,
        route: &RouteDefinition,
        path: &str,
        params: &Params,
    ) -> Option<CachedResponse> {
        let policy = route.cache_policy()?;
        let key = cache_key(path, params);

        match self.store.get(&key).await {
            Ok(Some(value)) => {
                tracing::debug!(cache.key = %key, "cache hit");
                Some(CachedResponse {
                    body: Bytes::from(value),
                    ttl_secs: policy.ttl_secs,
                })
            }
            Ok(None) => {
                tracing::debug!(cache.key = %key, "cache miss");
                None
            }
            Err(error) => {
                tracing::warn!(cache.key = %key, %error, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Stores a freshly computed response for `route`.
    ///
    /// Does nothing for routes without a cache policy. Store failures are
    /// logged and dropped.
    pub async fn store_response(
        &self,
        route: &RouteDefinition,
        path: &str,
        params: &Params,
        body: &Bytes,
    ) {
        let Some(policy) = route.cache_policy() else {
            return;
        };
        let key = cache_key(path, params);

        let Ok(value) = std::str::from_utf8(body) else {
            tracing::warn!(cache.key = %key, "response body is not UTF-8, not caching");
            return;
        };

        if let Err(error) = self.store.set(&key, value, policy.ttl_secs).await {
            tracing::warn!(cache.key = %key, %error, "cache write failed, response still served");
        }
    }
}

impl std::fmt::Debug for CacheGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGate").finish_non_exhaustive()
    }
}
