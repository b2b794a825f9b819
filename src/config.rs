//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_TTL_SECS;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Approximate cache memory budget in megabytes
    pub cache_max_memory_mb: usize,
    /// Default TTL in seconds for entries stored without an explicit TTL
    pub default_ttl: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Rate limiter state is dropped for users idle longer than this
    pub rate_limit_idle_secs: u64,
    /// Default general limit: requests allowed per window
    pub rate_limit_max_requests: u32,
    /// Default general limit: window length in seconds
    pub rate_limit_window: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_MAX_MEMORY_MB` - Cache memory budget (default: 100)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `RATE_LIMIT_IDLE_SECS` - Idle time before limiter state is dropped (default: 3600)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Requests per window (default: 30)
    /// - `RATE_LIMIT_WINDOW` - Window length in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_max_memory_mb: env_or("CACHE_MAX_MEMORY_MB", defaults.cache_max_memory_mb),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            rate_limit_idle_secs: env_or("RATE_LIMIT_IDLE_SECS", defaults.rate_limit_idle_secs),
            rate_limit_max_requests: env_or(
                "RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            rate_limit_window: env_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window),
        }
    }

    /// Cache memory budget in bytes.
    pub fn cache_max_memory_bytes(&self) -> usize {
        self.cache_max_memory_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 1000,
            cache_max_memory_mb: 100,
            default_ttl: DEFAULT_TTL_SECS,
            server_port: 3000,
            cleanup_interval: 60,
            rate_limit_idle_secs: 3600,
            rate_limit_max_requests: 30,
            rate_limit_window: 60,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
