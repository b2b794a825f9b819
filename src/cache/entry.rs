//! Cache Entry Module
//!
//! Defines the timestamped, hit-counted wrapper around one cached value.

use std::time::{Duration, Instant};

// == Expiry ==
/// Normalised time-to-live of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// TTL of `0`: the entry never expires.
    Never,
    /// Expires once strictly more than this much time has passed since creation.
    After(Duration),
    /// Negative TTL: the entry is expired from the moment it is created.
    Immediate,
}

impl Expiry {
    /// Converts a signed TTL in seconds.
    ///
    /// `0` means no expiry and negative values are clamped to "already expired".
    pub fn from_secs(ttl: i64) -> Self {
        match ttl {
            0 => Expiry::Never,
            t if t < 0 => Expiry::Immediate,
            t => Expiry::After(Duration::from_secs(t as u64)),
        }
    }

    /// Returns the TTL in seconds as reported to callers (`0` for no expiry).
    pub fn as_secs(&self) -> u64 {
        match self {
            Expiry::After(ttl) => ttl.as_secs(),
            Expiry::Never | Expiry::Immediate => 0,
        }
    }
}

// == Cache Entry ==
/// A single cached value with access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation instant
    pub created_at: Instant,
    /// Instant of the last successful read (or creation)
    pub last_accessed: Instant,
    /// Expiry policy derived from the TTL given at insertion
    pub expiry: Expiry,
    /// Number of successful reads
    pub hit_count: u64,
    /// Approximate memory cost in bytes
    pub size_estimate: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry stamped at `now`.
    pub fn new(value: V, expiry: Expiry, size_estimate: usize, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            last_accessed: now,
            expiry,
            hit_count: 0,
            size_estimate,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL at `now`.
    ///
    /// The boundary is exclusive: an entry with a 1 second TTL is still live
    /// exactly 1 second after creation.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expiry {
            Expiry::Never => false,
            Expiry::Immediate => true,
            Expiry::After(ttl) => self.age(now) > ttl,
        }
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
        self.hit_count += 1;
    }

    /// Time since creation.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Time since the last successful read.
    pub fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_accessed)
    }
}
