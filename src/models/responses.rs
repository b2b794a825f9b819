//! Response DTOs for the admin API
//!
//! Statistics endpoints serialize the cache and limiter snapshot types directly;
//! the bodies here cover the remaining operations.

use serde::Serialize;
use serde_json::Value;

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for operations acting on a single key
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    pub message: String,
    pub key: String,
}

impl KeyResponse {
    pub fn set(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }

    pub fn invalidated(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' invalidated", key),
            key,
        }
    }
}

/// Response body for bulk removals (pattern invalidation, sweeps, clear)
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub message: String,
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(message: impl Into<String>, removed: usize) -> Self {
        Self {
            message: message.into(),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
