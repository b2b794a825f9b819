//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::MAX_KEY_LENGTH;
use crate::ratelimit::UserId;

/// Request body for `PUT /cache`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    /// TTL in seconds; `0` never expires, omitted uses the default
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

/// Request body for `POST /cache/invalidate`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidatePatternRequest {
    /// Literal substring matched against keys
    pub pattern: String,
}

impl InvalidatePatternRequest {
    /// An empty pattern would match every key; clearing is a separate endpoint.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        None
    }
}

/// Query string for `GET /cache/top`
#[derive(Debug, Clone, Deserialize)]
pub struct TopKeysQuery {
    #[serde(default = "default_top_limit")]
    pub limit: usize,
}

fn default_top_limit() -> usize {
    10
}

/// Request body for `POST /ratelimit/check`
///
/// Omitted limits fall back to the configured defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitCheckRequest {
    pub user_id: UserId,
    /// Checks a per-action window instead of the general one when set
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub max_requests: Option<u32>,
    #[serde(default)]
    pub window_seconds: Option<u64>,
}

/// Request body for `POST /ratelimit/cleanup`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaleUsersRequest {
    #[serde(default)]
    pub idle_seconds: Option<u64>,
}
