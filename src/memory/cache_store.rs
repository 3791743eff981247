use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;
use crate::core::config::CacheConfig;
use crate::core::error::Result;
use crate::core::stats::CacheStats;
use crate::memory::tracker::MemoryTracker;
use crate::storage::SecondaryTier;

/// One cached value with its bookkeeping. Replaced wholesale, never mutated
/// apart from the access timestamp.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub size_estimate: usize,
    pub created_at: Instant,
    pub last_accessed_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// Result of a recency-refreshing read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    Hit(V),
    /// The entry was present but stale; it has been removed.
    Expired,
    Miss,
}

impl<V> Lookup<V> {
    pub fn into_value(self) -> Option<V> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Expired | Lookup::Miss => None,
        }
    }
}

/// Bounded key -> value store with LRU eviction, per-entry TTL and an
/// optional durable secondary tier.
///
/// Admission never fails: `set` evicts least-recently-used entries until both
/// the entry-count and the byte bounds hold, then inserts.
pub struct CacheStore<V> {
    entries: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
    tracker: Arc<MemoryTracker>,
    max_entries: usize,
    ttl: Duration,
    secondary: Option<SecondaryTier>,
    hit_count: Arc<AtomicUsize>,
    miss_count: Arc<AtomicUsize>,
    eviction_count: Arc<AtomicUsize>,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(config: &CacheConfig) -> Self {
        CacheStore {
            entries: Arc::new(Mutex::new(LruCache::unbounded())),
            tracker: Arc::new(MemoryTracker::new(config.max_memory_bytes)),
            max_entries: config.max_entries.max(1),
            ttl: config.ttl(),
            secondary: None,
            hit_count: Arc::new(AtomicUsize::new(0)),
            miss_count: Arc::new(AtomicUsize::new(0)),
            eviction_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_secondary(mut self, secondary: SecondaryTier) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Look up `key`, refreshing its recency. An expired entry is removed and
    /// reported as `Lookup::Expired` so the caller can drop what it derived
    /// from it.
    pub fn lookup(&self, key: &str) -> Lookup<V> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired = match entries.peek(key) {
            Some(entry) => entry.is_expired(self.ttl, now),
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                return Lookup::Miss;
            }
        };
        if expired {
            if let Some(entry) = entries.pop(key) {
                self.tracker.deallocate(entry.size_estimate);
            }
            log::debug!("cache entry '{}' expired", key);
            self.miss_count.fetch_add(1, Ordering::Relaxed);
            return Lookup::Expired;
        }

        match entries.get_mut(key) {
            Some(entry) => {
                entry.last_accessed_at = now;
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Lookup::Hit(entry.value.clone())
            }
            None => Lookup::Miss,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.lookup(key).into_value()
    }

    /// Read `key` without touching recency, counters or expiry bookkeeping.
    /// Expired entries read as absent but stay until the next `get` or sweep.
    pub fn peek(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.lock();
        entries
            .peek(key)
            .filter(|entry| !entry.is_expired(self.ttl, now))
            .map(|entry| entry.value.clone())
    }

    /// Whether a live entry exists. Read-only, like `peek`.
    pub fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(self.ttl, now))
    }

    /// Insert or replace `key`. Returns the keys evicted to make room.
    pub fn set(&self, key: &str, value: V, size_estimate: usize) -> Vec<String> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let mut evicted = Vec::new();

        if let Some(previous) = entries.pop(key) {
            self.tracker.deallocate(previous.size_estimate);
        }

        while entries.len() + 1 > self.max_entries || !self.tracker.fits(size_estimate) {
            match entries.pop_lru() {
                Some((victim, entry)) => {
                    self.tracker.deallocate(entry.size_estimate);
                    log::trace!("evicting cache entry '{}' ({} bytes)", victim, entry.size_estimate);
                    evicted.push(victim);
                }
                None => break,
            }
        }
        self.eviction_count.fetch_add(evicted.len(), Ordering::Relaxed);

        self.tracker.allocate(size_estimate);
        entries.put(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                value,
                size_estimate,
                created_at: now,
                last_accessed_at: now,
            },
        );
        evicted
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.entries.lock().pop(key) {
            Some(entry) => {
                self.tracker.deallocate(entry.size_estimate);
                true
            }
            None => false,
        }
    }

    /// Drop every fast-tier entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.tracker.reset();
    }

    /// Sweep all expired entries, returning their keys.
    pub fn evict_expired_keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            if let Some(entry) = entries.pop(key) {
                self.tracker.deallocate(entry.size_estimate);
            }
        }
        expired
    }

    pub fn evict_expired(&self) -> usize {
        self.evict_expired_keys().len()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.len(),
            approx_bytes: self.tracker.current_usage(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            eviction_count: self.eviction_count.load(Ordering::Relaxed),
        }
    }

    /// Consult the secondary tier after a fast-tier miss. A hit repopulates
    /// the fast tier before it is returned.
    pub async fn restore(
        &self,
        key: &str,
        decode: impl FnOnce(&[u8]) -> Result<V>,
        size_of: impl FnOnce(&V) -> usize,
    ) -> Option<(V, Vec<String>)> {
        let secondary = self.secondary.as_ref()?;
        let value = secondary.restore(key, decode).await?;
        let evicted = self.set(key, value.clone(), size_of(&value));
        log::debug!("restored '{}' from the secondary tier", key);
        Some((value, evicted))
    }

    /// Mirror an already-admitted value to the secondary tier. Failures are
    /// swallowed.
    pub async fn mirror(&self, key: &str, encode: impl FnOnce() -> Result<Vec<u8>>) {
        let Some(secondary) = self.secondary.as_ref() else {
            return;
        };
        match encode() {
            Ok(raw) => {
                secondary.persist(key, &raw).await;
            }
            Err(e) => log::warn!("skipping secondary tier write of '{}': {}", key, e),
        }
    }

    /// Clear both tiers.
    pub async fn clear_all(&self) {
        self.clear();
        if let Some(secondary) = self.secondary.as_ref() {
            secondary.clear().await;
        }
    }

    pub async fn forget(&self, key: &str) {
        self.remove(key);
        if let Some(secondary) = self.secondary.as_ref() {
            secondary.discard(key).await;
        }
    }
}

impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        CacheStore {
            entries: self.entries.clone(),
            tracker: self.tracker.clone(),
            max_entries: self.max_entries,
            ttl: self.ttl,
            secondary: self.secondary.clone(),
            hit_count: self.hit_count.clone(),
            miss_count: self.miss_count.clone(),
            eviction_count: self.eviction_count.clone(),
        }
    }
}
