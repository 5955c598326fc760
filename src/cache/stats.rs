//! Cache Metrics Module
//!
//! Tracks lookup outcomes (hits, misses) and evictions and derives rates from
//! them. Counters only observe the cache; they never influence it.

use serde::Serialize;
use tracing::info;

// == Cache Metrics ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Number of lookups that returned a live value
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries evicted to stay within capacity
    pub evictions: u64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates a new CacheMetrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lookups served, hits plus misses.
    pub fn total_lookups(&self) -> u64 {
        self.hits + self.misses
    }

    // == Rates ==
    /// hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        self.ratio(self.hits)
    }

    /// misses / (hits + misses), or 0.0 before any lookup.
    pub fn miss_rate(&self) -> f64 {
        self.ratio(self.misses)
    }

    /// evictions / (hits + misses), or 0.0 before any lookup.
    ///
    /// Evictions happen on writes, so this can exceed 1.0 for write-heavy use.
    pub fn eviction_rate(&self) -> f64 {
        self.ratio(self.evictions)
    }

    fn ratio(&self, count: u64) -> f64 {
        let total = self.total_lookups();
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    }

    // == Recording ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Reset ==
    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // == Reporting ==
    /// Renders the three report lines: hit rate, miss rate, eviction rate.
    pub fn report_lines(&self) -> [String; 3] {
        [
            format!("Hit rate: {:.2}%", self.hit_rate() * 100.0),
            format!("Miss rate: {:.2}%", self.miss_rate() * 100.0),
            format!("Eviction rate: {:.2}%", self.eviction_rate() * 100.0),
        ]
    }

    /// Writes the report lines to the log.
    pub fn log(&self) {
        for line in self.report_lines() {
            info!("{}", line);
        }
    }
}
