//! Cache Manager Module
//!
//! Thread-safe facade over [`BoundedCache`] adding TTL expiry, pattern
//! invalidation and hit/miss statistics.
//!
//! Every operation, reads included, takes the same exclusive lock: a read
//! promotes recency and bumps hit counts, so there is no read-only path.
//! Concurrent misses for the same key are not coalesced; callers that
//! recompute on miss may do so several times.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{BoundedCache, CacheEntry, CacheStats, CacheStatsSnapshot, Expiry};
use crate::clock::{Clock, SystemClock};

/// Pluggable estimate of a value's memory cost in bytes.
pub type SizeEstimator<V> = Arc<dyn Fn(&V) -> usize + Send + Sync>;

/// Estimates a JSON value by its serialized length.
pub fn json_size(value: &Value) -> usize {
    serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
}

// == Entry Info ==
/// Diagnostic view of a single entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryInfo {
    pub age_secs: f64,
    /// TTL given at insertion, `0` for no expiry
    pub ttl_secs: u64,
    pub hit_count: u64,
    pub size_bytes: usize,
    pub last_accessed_secs_ago: f64,
    pub expired: bool,
}

// == Top Key ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopKey {
    pub key: String,
    pub hit_count: u64,
}

struct Inner<V> {
    cache: BoundedCache<V>,
    stats: CacheStats,
}

// == Cache Manager ==
pub struct CacheManager<V = Value> {
    inner: Mutex<Inner<V>>,
    clock: Arc<dyn Clock>,
    estimator: SizeEstimator<V>,
    default_ttl: i64,
}

impl CacheManager<Value> {
    // == Constructor ==
    /// Creates a JSON value cache on the system clock.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries
    /// * `max_memory_bytes` - Approximate memory budget
    /// * `default_ttl` - TTL in seconds used by [`CacheManager::set_default`]
    pub fn new(max_entries: usize, max_memory_bytes: usize, default_ttl: i64) -> Self {
        Self::with_parts(
            max_entries,
            max_memory_bytes,
            default_ttl,
            Arc::new(SystemClock),
            Arc::new(json_size),
        )
    }
}

impl<V: Clone> CacheManager<V> {
    /// Creates a cache with an explicit clock and size estimator.
    pub fn with_parts(
        max_entries: usize,
        max_memory_bytes: usize,
        default_ttl: i64,
        clock: Arc<dyn Clock>,
        estimator: SizeEstimator<V>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                cache: BoundedCache::new(max_entries, max_memory_bytes),
                stats: CacheStats::new(),
            }),
            clock,
            estimator,
            default_ttl,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed on the spot and counted as an expiration,
    /// not a miss. The entry is promoted in recency order before the expiry
    /// check.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let Inner { cache, stats } = &mut *inner;

        let Some(entry) = cache.get(key) else {
            stats.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            cache.delete(key);
            stats.record_expirations(1);
            debug!(key = %key, "lazily expired cache entry");
            return None;
        }

        entry.touch(now);
        let value = entry.value.clone();
        stats.record_hit();
        Some(value)
    }

    // == Set ==
    /// Stores `value` under `key` with a TTL in seconds.
    ///
    /// `ttl == 0` never expires; a negative TTL stores an already-expired entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: i64) {
        let now = self.clock.now();
        let size = (self.estimator)(&value);
        let entry = CacheEntry::new(value, Expiry::from_secs(ttl), size, now);

        let mut inner = self.inner.lock();
        inner.cache.set(key.into(), entry);
        inner.stats.record_set();
    }

    /// Stores `value` with the configured default TTL.
    pub fn set_default(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl);
    }

    // == Invalidate ==
    /// Removes `key`, returning whether anything was removed.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.cache.delete(key);
        if removed {
            inner.stats.record_invalidations(1);
        }
        removed
    }

    /// Removes every key containing `pattern` as a literal substring.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let mut inner = self.inner.lock();
        let matching: Vec<String> = inner
            .cache
            .keys()
            .into_iter()
            .filter(|key| key.contains(pattern))
            .collect();

        let mut removed = 0;
        for key in &matching {
            if inner.cache.delete(key) {
                removed += 1;
            }
        }
        inner.stats.record_invalidations(removed as u64);
        if removed > 0 {
            debug!(pattern = %pattern, removed, "invalidated cache entries by pattern");
        }
        removed
    }

    // == Clear ==
    /// Drops all entries, returning how many were dropped. Statistics are
    /// preserved.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let dropped = inner.cache.len();
        inner.cache.clear();
        info!(dropped, "cache cleared");
        dropped
    }

    // == Cleanup ==
    /// Removes every expired entry, returning how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let expired = inner.cache.expired_keys(now);

        for key in &expired {
            inner.cache.delete(key);
        }
        inner.stats.record_expirations(expired.len() as u64);
        expired.len()
    }

    // == Stats ==
    pub fn get_stats(&self) -> CacheStatsSnapshot {
        let inner = self.inner.lock();
        inner.stats.snapshot(inner.cache.stats())
    }

    // == Info ==
    /// Describes one entry without promoting it or counting a read.
    pub fn get_info(&self, key: &str) -> Option<EntryInfo> {
        let now = self.clock.now();
        let inner = self.inner.lock();
        inner.cache.peek(key).map(|entry| EntryInfo {
            age_secs: entry.age(now).as_secs_f64(),
            ttl_secs: entry.expiry.as_secs(),
            hit_count: entry.hit_count,
            size_bytes: entry.size_estimate,
            last_accessed_secs_ago: entry.idle(now).as_secs_f64(),
            expired: entry.is_expired(now),
        })
    }

    // == Top Keys ==
    /// Keys with the most hits, highest first.
    ///
    /// Equal hit counts are ordered most-recently-used first.
    pub fn get_top_keys(&self, limit: usize) -> Vec<TopKey> {
        let counts = self.inner.lock().cache.hit_counts();
        let mut ranked: Vec<TopKey> = counts
            .into_iter()
            .rev()
            .map(|(key, hit_count)| TopKey { key, hit_count })
            .collect();
        ranked.sort_by(|a, b| b.hit_count.cmp(&a.hit_count));
        ranked.truncate(limit);
        ranked
    }

    pub fn len(&self) -> usize {
        self.inner.lock().cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
