//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker, Payload};

/// Upper bound on entries reserved when a store is created.
const PREALLOC_LIMIT: usize = 1024;

// == Store State ==
/// Map, recency list and counters, always mutated together under one lock.
#[derive(Debug)]
struct State {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
}

impl State {
    fn with_capacity(capacity: usize) -> Self {
        // One spare slot: an insert briefly holds capacity + 1 entries before eviction.
        // Large stores grow on demand instead of reserving everything up front.
        let reserve = capacity.min(PREALLOC_LIMIT).saturating_add(1);
        Self {
            entries: HashMap::with_capacity(reserve),
            lru: LruTracker::with_capacity(reserve),
            stats: CacheStats::new(),
        }
    }

    fn get(&mut self, key: &str, now: Instant) -> Option<Arc<Payload>> {
        let entry = match self.entries.get(key) {
            Some(entry) => entry,
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if entry.is_expired_at(now) {
            self.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        let payload = Arc::clone(&entry.payload);
        let node = entry.node;
        self.lru.touch(node);
        self.stats.record_hit();
        Some(payload)
    }

    /// Inserts or refreshes `key`, returning the evicted key on overflow.
    fn set(
        &mut self,
        key: String,
        payload: Arc<Payload>,
        ttl: Duration,
        now: Instant,
        capacity: usize,
    ) -> Option<String> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.refresh(payload, ttl, now);
            let node = entry.node;
            self.lru.touch(node);
            return None;
        }

        let node = self.lru.push_front(key.clone());
        self.entries
            .insert(key, CacheEntry::new(payload, ttl, now, node));

        if self.entries.len() <= capacity {
            return None;
        }
        let evicted = self.lru.evict_oldest()?;
        self.entries.remove(&evicted);
        self.stats.record_eviction();
        Some(evicted)
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(entry.node);
                true
            }
            None => false,
        }
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        self.stats.record_expirations(expired.len());
        expired.len()
    }
}

// == Cache Store ==
/// Bounded, thread-safe response store with LRU eviction and lazy TTL expiry.
///
/// All reads and writes go through a single mutex held only for the O(1)
/// map and list updates. The lock is never held while fetching or replaying.
///
/// A store built with capacity zero is disabled: every lookup misses and
/// every store is ignored, so callers can run the same code path with
/// caching turned off.
#[derive(Debug)]
pub struct CacheStore {
    state: Option<Mutex<State>>,
    capacity: usize,
    max_entry_bytes: Option<usize>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries.
    ///
    /// A capacity of zero returns a disabled store.
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::disabled();
        }
        Self {
            state: Some(Mutex::new(State::with_capacity(capacity))),
            capacity,
            max_entry_bytes: None,
        }
    }

    /// Creates a store that never holds anything.
    pub fn disabled() -> Self {
        Self {
            state: None,
            capacity: 0,
            max_entry_bytes: None,
        }
    }

    /// Skips storing payloads whose body exceeds `limit` bytes. Zero removes the limit.
    pub fn with_max_entry_bytes(mut self, limit: usize) -> Self {
        self.max_entry_bytes = (limit > 0).then_some(limit);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_entry_bytes(&self) -> Option<usize> {
        self.max_entry_bytes
    }

    // == Get ==
    /// Returns the payload for `key` if present and not expired.
    ///
    /// A hit moves the entry to the most recently used position. An expired
    /// entry is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<Arc<Payload>> {
        let state = self.state.as_ref()?;
        state.lock().get(key, Instant::now())
    }

    // == Set ==
    /// Stores `payload` under `key` for `ttl`.
    ///
    /// A zero TTL is ignored. An existing key gets the new payload, a fresh
    /// TTL and the most recently used position. A new key that pushes the
    /// store over capacity evicts exactly the least recently used entry.
    pub fn set(&self, key: impl Into<String>, payload: Arc<Payload>, ttl: Duration) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if ttl.is_zero() {
            return;
        }

        let key = key.into();
        if let Some(limit) = self.max_entry_bytes {
            let size = payload.body().len();
            if size > limit {
                state.lock().stats.record_oversized();
                debug!(
                    "Skipping cache store for {}: body of {} bytes exceeds limit of {} bytes",
                    key, size, limit
                );
                return;
            }
        }

        let evicted = state
            .lock()
            .set(key, payload, ttl, Instant::now(), self.capacity);

        if let Some(evicted) = evicted {
            debug!("Evicted least recently used cache entry {}", evicted);
        }
    }

    // == Remove ==
    /// Removes `key`, returning whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        match self.state.as_ref() {
            Some(state) => state.lock().remove(key),
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        if let Some(state) = self.state.as_ref() {
            let mut state = state.lock();
            state.entries.clear();
            state.lru.clear();
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries, returning how many were dropped.
    ///
    /// Lookups already ignore expired entries; this only frees their slots early.
    pub fn purge_expired(&self) -> usize {
        match self.state.as_ref() {
            Some(state) => state.lock().purge_expired(Instant::now()),
            None => 0,
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        match self.state.as_ref() {
            Some(state) => {
                let state = state.lock();
                let mut stats = state.stats.clone();
                stats.set_total_entries(state.entries.len());
                stats
            }
            None => CacheStats::default(),
        }
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unread ones included.
    pub fn len(&self) -> usize {
        self.state
            .as_ref()
            .map_or(0, |state| state.lock().entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.state.as_ref().map_or_else(Vec::new, |state| {
            state.lock().lru.iter().map(str::to_string).collect()
        })
    }

    /// Panics if the key map and recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let state = state.lock();
        assert!(state.entries.len() <= self.capacity, "store exceeds capacity");
        assert_eq!(state.entries.len(), state.lru.len(), "map and list sizes differ");
        for (key, entry) in &state.entries {
            assert_eq!(state.lru.key(entry.node), Some(key.as_str()), "entry node mismatch");
        }
        assert_eq!(state.lru.iter().count(), state.lru.len(), "list is not well linked");
    }
}
