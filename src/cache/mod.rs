//! Cache Module
//!
//! Size- and memory-bounded caching with TTL expiration and LRU eviction.

mod bounded;
mod entry;
mod manager;
mod stats;


// Re-export public types
pub use bounded::{BoundedCache, BoundedStats, EvictionReason};
pub use entry::{CacheEntry, Expiry};
pub use manager::{json_size, CacheManager, EntryInfo, SizeEstimator, TopKey};
pub use stats::{CacheStats, CacheStatsSnapshot};

// == Public Constants ==
/// TTL in seconds applied when callers do not choose one
pub const DEFAULT_TTL_SECS: i64 = 300;

/// Maximum allowed key length in bytes on the HTTP surface
pub const MAX_KEY_LENGTH: usize = 256;
