//! Cache store abstraction and the in-process backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::CacheError;

/// A key-value store with per-entry expiry.
///
/// Each call is expected to be atomic on its own; callers do no locking
/// around get-then-set.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` for `ttl_secs` seconds, replacing any
    /// previous value.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;
}

/// Process-local store on a sharded concurrent map.
///
/// Expired entries are dropped lazily when read. Writes also sweep every
/// expired entry, at most once per [`SWEEP_INTERVAL`], so keys that are
/// written once and never read again do not accumulate.
/// [`purge_expired`](Self::purge_expired) sweeps on demand. A TTL of zero
/// stores nothing.
///
/// # Example
///
/// ```rust
/// use heron_cache::{CacheStore, InMemoryStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryStore::new();
/// store.set("report:{}", "[1,2,3]", 60).await.unwrap();
/// assert_eq!(store.get("report:{}").await.unwrap().as_deref(), Some("[1,2,3]"));
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    entries: DashMap<String, (String, Instant)>,
    created: Instant,
    // Milliseconds after `created` at which the next write sweeps.
    next_sweep_ms: AtomicU64,
}

/// Minimum time between two sweeps triggered by writes.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            created: Instant::now(),
            next_sweep_ms: AtomicU64::new(interval_ms()),
        }
    }
}

fn interval_ms() -> u64 {
    u64::try_from(SWEEP_INTERVAL.as_millis()).unwrap_or(u64::MAX)
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Sweeps if the interval has passed; only one concurrent writer wins.
    fn maybe_sweep(&self) {
        let now_ms = u64::try_from(self.created.elapsed().as_millis()).unwrap_or(u64::MAX);
        let due = self.next_sweep_ms.load(Ordering::Relaxed);
        if now_ms < due {
            return;
        }
        let next = now_ms.saturating_add(interval_ms());
        if self
            .next_sweep_ms
            .compare_exchange(due, next, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            let purged = self.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = self.entries.len(), "swept expired cache entries");
            }
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.1 > now => return Ok(Some(entry.0.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(key, |_, (_, expires_at)| *expires_at <= now);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        if ttl_secs == 0 {
            return Ok(());
        }
        self.maybe_sweep();
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }
}
