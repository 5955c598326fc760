//! Cache Store Module
//!
//! Eviction engine combining a HashMap index with the recency list, LRU
//! eviction on overflow and lazy TTL expiration on read.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{
    CacheMetrics, Clock, DebugSnapshot, Entry, Lookup, RecencyList, SnapshotEntry, SystemClock,
};
use crate::config::{Config, DEFAULT_TTL_MS};
use crate::error::{CacheError, Result};

// == LRU TTL Cache ==
/// Fixed-capacity cache with LRU eviction and per-entry TTL.
///
/// Expiry is lazy: an expired entry stays linked, and keeps its capacity slot,
/// until a read finds it or it falls off the tail.
#[derive(Debug)]
pub struct LruTtlCache<T, C = SystemClock> {
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Entries in recency order
    list: RecencyList<T>,
    /// Lookup and eviction counters
    metrics: CacheMetrics,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied by `insert`
    default_ttl: Duration,
    clock: C,
}

impl<T> LruTtlCache<T, SystemClock> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries, timed by the wall clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be at least 1
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, SystemClock)
    }

    /// Creates a cache from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.capacity)?.with_default_ttl(config.default_ttl()))
    }
}

impl<T, C: Clock> LruTtlCache<T, C> {
    /// Creates a cache driven by the given clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be at least 1
    /// * `clock` - Time source for stamping and expiring entries
    pub fn with_clock(capacity: usize, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            list: RecencyList::with_capacity(capacity),
            metrics: CacheMetrics::new(),
            capacity,
            default_ttl: Duration::from_millis(DEFAULT_TTL_MS),
            clock,
        })
    }

    /// Sets the TTL used by `insert`.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    // == Put ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// An existing entry for `key` is replaced by a fresh node at the head;
    /// replacement is not counted as an eviction. If the insert pushes the
    /// cache past capacity, the least recently used entry is evicted.
    ///
    /// # Arguments
    /// * `key` - The cache key
    /// * `value` - The value to store
    /// * `ttl` - Lifetime from now; sub-millisecond parts are truncated
    pub fn put(&mut self, key: impl Into<String>, value: T, ttl: Duration) -> &mut Self {
        let key = key.into();
        let now = self.clock.now_ms();

        if let Some(stale) = self.index.remove(&key) {
            self.list.remove(stale);
            trace!(key = %key, "replacing existing entry");
        }

        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let idx = self.list.push_front(Entry::new(key.clone(), value, now, ttl_ms));
        self.index.insert(key, idx);

        while self.list.len() > self.capacity {
            if !self.evict_lru() {
                break;
            }
        }

        self.debug_check();
        self
    }

    /// Stores `value` under `key` with the default TTL.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        let ttl = self.default_ttl;
        self.put(key, value, ttl)
    }

    // == Get ==
    /// Returns the live value for `key`, promoting it to most recently used.
    ///
    /// Absent and expired keys return None and count as misses. An expired
    /// entry is dropped on the way out.
    ///
    /// # Arguments
    /// * `key` - The cache key to look up
    pub fn get(&mut self, key: &str) -> Option<&T> {
        self.lookup(key).into_option()
    }

    /// Same as `get`, wrapped in a `Lookup` for chained transformations.
    pub fn get_option(&mut self, key: &str) -> Lookup<&T> {
        self.lookup(key)
    }

    fn lookup(&mut self, key: &str) -> Lookup<&T> {
        let now = self.clock.now_ms();

        let Some(&idx) = self.index.get(key) else {
            self.metrics.record_miss();
            return Lookup::Miss;
        };

        let expired = self
            .list
            .get(idx)
            .map_or(true, |entry| entry.is_expired_at(now));

        if expired {
            self.index.remove(key);
            self.list.remove(idx);
            self.metrics.record_miss();
            debug!(key, "dropped expired entry on read");
            self.debug_check();
            return Lookup::Miss;
        }

        self.list.move_to_front(idx);
        self.metrics.record_hit();
        self.list.get(idx).map(|entry| &entry.value).into()
    }

    // == Peek ==
    /// Returns the live value for `key` without promoting it or touching metrics.
    pub fn peek(&self, key: &str) -> Option<&T> {
        let now = self.clock.now_ms();
        let idx = *self.index.get(key)?;
        self.list
            .get(idx)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| &entry.value)
    }

    /// Checks whether `key` holds a live value. Does not promote.
    pub fn contains(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    /// Remaining lifetime of a live entry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        let idx = *self.index.get(key)?;
        self.list
            .get(idx)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| Duration::from_millis(entry.ttl_remaining_ms(now)))
    }

    // == Remove ==
    /// Deletes `key`. Returns its value if it was still live.
    ///
    /// Explicit removal is neither a miss nor an eviction.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let idx = self.index.remove(key)?;
        let now = self.clock.now_ms();
        let entry = self.list.remove(idx);
        self.debug_check();

        entry
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value)
    }

    // == Purge Expired ==
    /// Removes every expired entry in one pass. Returns how many were dropped.
    ///
    /// Nothing calls this implicitly; reads remain the only automatic expiry.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<usize> = self
            .list
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(idx, _)| idx)
            .collect();

        let count = expired.len();
        for idx in expired {
            if let Some(entry) = self.list.remove(idx) {
                self.index.remove(&entry.key);
            }
        }

        if count > 0 {
            debug!(count, "purged expired entries");
        }
        self.debug_check();
        count
    }

    // == Clear ==
    /// Drops every entry and zeroes the metrics.
    pub fn clear(&mut self) {
        let dropped = self.list.len();
        self.index.clear();
        self.list.clear();
        self.metrics.reset();
        debug!(dropped, "cache cleared");
    }

    /// Zeroes the metrics, leaving entries in place.
    pub fn clear_metrics(&mut self) {
        self.metrics.reset();
    }

    // == Accessors ==
    /// Number of linked entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Current counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.metrics
    }

    /// Writes hit, miss and eviction rates to the log.
    pub fn log_metrics(&self) {
        self.metrics.log();
    }

    /// Linked keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.list.iter().map(|(_, entry)| entry.key.as_str())
    }

    // == Consistency ==
    /// Verifies that the index and the recency list describe the same entries,
    /// that the list is well formed and that capacity holds.
    pub fn is_consistent(&self) -> bool {
        self.list.is_consistent()
            && self.index.len() == self.list.len()
            && self.list.len() <= self.capacity
            && self.index.iter().all(|(key, &idx)| {
                self.list
                    .get(idx)
                    .is_some_and(|entry| entry.key == *key)
            })
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.index.len(), self.list.len(), "index and list diverged");
        debug_assert!(self.list.len() <= self.capacity, "capacity exceeded");
    }

    // == Evict ==
    /// Drops the tail entry. Returns false when the list is empty.
    fn evict_lru(&mut self) -> bool {
        match self.list.pop_back() {
            Some(entry) => {
                self.index.remove(&entry.key);
                self.metrics.record_eviction();
                debug!(key = %entry.key, "evicted least recently used entry");
                true
            }
            None => false,
        }
    }
}

impl<T: Debug, C: Clock> LruTtlCache<T, C> {
    // == Debug Snapshot ==
    /// Captures the list (head to tail, capped at `capacity` nodes), the index
    /// and the metrics. Does not promote or count anything.
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let now = self.clock.now_ms();

        let entries = self
            .list
            .iter()
            .take(self.capacity)
            .map(|(slot, entry)| SnapshotEntry {
                slot,
                key: entry.key.clone(),
                value: format!("{:?}", entry.value),
                expires_at: entry.expires_at,
                ttl_remaining_ms: entry.ttl_remaining_ms(now),
                expired: entry.is_expired_at(now),
            })
            .collect();

        let index: BTreeMap<String, usize> = self
            .index
            .iter()
            .map(|(key, &idx)| (key.clone(), idx))
            .collect();

        DebugSnapshot {
            capacity: self.capacity,
            len: self.list.len(),
            now_ms: now,
            entries,
            index,
            metrics: self.metrics,
        }
    }

    /// Writes the debug snapshot to the log.
    pub fn log_debug(&self) {
        debug!("{}", self.debug_snapshot());
    }
}
