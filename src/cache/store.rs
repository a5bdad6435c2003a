//! Cache storage.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store holding serialized list payloads.
///
/// `get` returns `None` only when no live entry exists; a stored empty payload
/// is still a hit.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    async fn set(&self, key: &str, payload: Bytes, ttl: Duration) -> Result<(), CacheError>;
}

struct Entry {
    payload: Bytes,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local cache store.
///
/// Expired entries are dropped on lookup, and `set` sweeps the whole map at most
/// once per TTL so keys that are never requested again do not accumulate.
pub struct MemoryCacheStore {
    entries: DashMap<String, Entry>,
    epoch: Instant,
    // milliseconds after `epoch` before which no sweep runs
    next_sweep_ms: AtomicU64,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            epoch: Instant::now(),
            next_sweep_ms: AtomicU64::new(0),
        }
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until they are swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry if the sweep interval has elapsed.
    fn sweep_expired(&self, now: Instant, interval: Duration) {
        let elapsed_ms = millis(now.saturating_duration_since(self.epoch));
        let due_ms = self.next_sweep_ms.load(Ordering::Acquire);
        if elapsed_ms < due_ms {
            return;
        }
        let next_ms = elapsed_ms.saturating_add(millis(interval));
        // one caller per interval wins the sweep
        if self
            .next_sweep_ms
            .compare_exchange(due_ms, next_ms, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let now = Instant::now();
        {
            let Some(entry) = self.entries.get(key) else {
                return Ok(None);
            };
            if !entry.is_expired(now) {
                return Ok(Some(entry.payload.clone()));
            }
        }
        // the read guard must be released before removal on the same shard
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn set(&self, key: &str, payload: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        self.sweep_expired(now, ttl);
        self.entries.insert(
            key.to_string(),
            Entry {
                payload,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
