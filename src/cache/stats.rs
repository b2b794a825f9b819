//! Cache Statistics Module
//!
//! Tracks lifetime counters of the cache manager.

use serde::Serialize;

use crate::cache::BoundedStats;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// == Cache Stats ==
/// Process-lifetime counters. Never reset by `clear()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads that returned a live value
    pub hits: u64,
    /// Reads for keys that were not present
    pub misses: u64,
    /// Values stored
    pub sets: u64,
    /// Entries removed by explicit or pattern invalidation
    pub invalidations: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_invalidations(&mut self, count: u64) {
        self.invalidations += count;
    }

    pub fn record_expirations(&mut self, count: u64) {
        self.expirations += count;
    }

    /// Combines the counters with the container figures into a reportable snapshot.
    pub fn snapshot(&self, bounded: BoundedStats) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits,
            misses: self.misses,
            sets: self.sets,
            invalidations: self.invalidations,
            expirations: self.expirations,
            hit_rate: self.hit_rate(),
            cache_size: bounded.size,
            memory_bytes: bounded.memory_bytes,
            memory_mb: bounded.memory_bytes as f64 / BYTES_PER_MB,
            evictions: bounded.evictions,
            memory_evictions: bounded.memory_evictions,
        }
    }
}

// == Cache Stats Snapshot ==
/// Point-in-time view of the cache served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub invalidations: u64,
    pub expirations: u64,
    pub hit_rate: f64,
    pub cache_size: usize,
    pub memory_bytes: usize,
    pub memory_mb: f64,
    pub evictions: u64,
    pub memory_evictions: u64,
}
