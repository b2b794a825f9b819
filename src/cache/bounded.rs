//! Bounded Cache Module
//!
//! Ordered key/entry container with count and memory limits and LRU eviction.

use std::time::Instant;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::cache::CacheEntry;

// == Eviction Reason ==
/// Why an entry was pushed out of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// The entry count limit was reached
    Count,
    /// Admitting the new entry would exceed the memory limit
    Memory,
}

// == Bounded Stats ==
/// Size and eviction figures of a [`BoundedCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoundedStats {
    /// Current number of entries
    pub size: usize,
    /// Sum of the size estimates of all entries
    pub memory_bytes: usize,
    /// Entries evicted because of the count limit
    pub evictions: u64,
    /// Entries evicted because of the memory limit
    pub memory_evictions: u64,
}

// == Bounded Cache ==
/// LRU-ordered storage for cache entries.
///
/// Entries are kept in an insertion-ordered map where:
/// - Front = Least recently used
/// - Back = Most recently used
#[derive(Debug)]
pub struct BoundedCache<V> {
    entries: IndexMap<String, CacheEntry<V>>,
    max_entries: usize,
    max_memory_bytes: usize,
    memory_bytes: usize,
    evictions: u64,
    memory_evictions: u64,
}

impl<V> BoundedCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// `max_entries` is clamped to at least 1 so an admitted entry can always be held.
    pub fn new(max_entries: usize, max_memory_bytes: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            max_entries: max_entries.max(1),
            max_memory_bytes,
            memory_bytes: 0,
            evictions: 0,
            memory_evictions: 0,
        }
    }

    // == Get ==
    /// Looks up an entry and promotes it to most-recently-used.
    ///
    /// Promotion happens regardless of whether the caller later finds the entry
    /// expired. Moving the entry to the back shifts the ones after it, so a
    /// promotion costs O(n) in the number of entries.
    pub fn get(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index_mut(last).map(|(_, entry)| entry)
    }

    /// Looks up an entry without touching the recency order.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Set ==
    /// Inserts or replaces an entry at the most-recently-used position.
    ///
    /// Evicts from the LRU end first to respect the count limit, then until the
    /// new entry fits in the memory limit. An entry larger than the whole memory
    /// budget is still admitted into an otherwise empty cache.
    pub fn set(&mut self, key: String, entry: CacheEntry<V>) {
        if let Some(old) = self.entries.shift_remove(&key) {
            self.release(old.size_estimate);
        }

        while self.entries.len() >= self.max_entries {
            self.evict_oldest(EvictionReason::Count);
        }

        while !self.entries.is_empty()
            && self.memory_bytes + entry.size_estimate > self.max_memory_bytes
        {
            self.evict_oldest(EvictionReason::Memory);
        }

        self.memory_bytes += entry.size_estimate;
        self.entries.insert(key, entry);
    }

    // == Delete ==
    /// Removes an entry, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.entries.shift_remove(key) {
            Some(entry) => {
                self.release(entry.size_estimate);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry. Eviction counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.memory_bytes = 0;
    }

    // == Stats ==
    pub fn stats(&self) -> BoundedStats {
        BoundedStats {
            size: self.entries.len(),
            memory_bytes: self.memory_bytes,
            evictions: self.evictions,
            memory_evictions: self.memory_evictions,
        }
    }

    // == Keys ==
    /// Snapshot of all keys, least recently used first.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Expired Keys ==
    /// Keys of every entry expired at `now`, least recently used first.
    ///
    /// Only the keys are copied; values stay in place.
    pub fn expired_keys(&self, now: Instant) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Hit Counts ==
    /// `(key, hit_count)` pairs, least recently used first.
    pub fn hit_counts(&self) -> Vec<(String, u64)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.hit_count))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removing the front shifts every remaining entry down, O(n).
    fn evict_oldest(&mut self, reason: EvictionReason) {
        let Some((key, entry)) = self.entries.shift_remove_index(0) else {
            return;
        };
        self.release(entry.size_estimate);
        match reason {
            EvictionReason::Count => self.evictions += 1,
            EvictionReason::Memory => self.memory_evictions += 1,
        }
        debug!(key = %key, ?reason, size = entry.size_estimate, "evicted cache entry");
    }

    fn release(&mut self, size: usize) {
        self.memory_bytes = self.memory_bytes.saturating_sub(size);
    }
}

impl<V: Clone> BoundedCache<V> {
    // == Items ==
    /// Snapshot copy of all entries, least recently used first.
    pub fn items(&self) -> Vec<(String, CacheEntry<V>)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }
}
