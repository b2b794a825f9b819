//! API Handlers
//!
//! HTTP handlers for the admin dashboard over the cache and the rate limiter.
//! Every handler finishes its synchronous cache/limiter call before returning;
//! no lock is held across an await point.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::{CacheManager, CacheStatsSnapshot, EntryInfo, TopKey};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    GetResponse, HealthResponse, InvalidatePatternRequest, KeyResponse, RateLimitCheckRequest,
    RemovedResponse, SetRequest, StaleUsersRequest, TopKeysQuery,
};
use crate::ratelimit::{LimiterSummary, RateLimitDecision, RateLimiter, UserId, UserLimitStats};

/// Limits applied when a check request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultLimits {
    pub max_requests: u32,
    pub window_seconds: u64,
    pub idle_seconds: u64,
}

impl Default for DefaultLimits {
    fn default() -> Self {
        let config = Config::default();
        Self {
            max_requests: config.rate_limit_max_requests,
            window_seconds: config.rate_limit_window,
            idle_seconds: config.rate_limit_idle_secs,
        }
    }
}

/// Application state shared across all handlers.
///
/// The cache and limiter are created once at startup and shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheManager>,
    pub limiter: Arc<RateLimiter>,
    pub limits: DefaultLimits,
}

impl AppState {
    pub fn new(cache: CacheManager, limiter: RateLimiter, limits: DefaultLimits) -> Self {
        Self {
            cache: Arc::new(cache),
            limiter: Arc::new(limiter),
            limits,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheManager::new(
            config.cache_max_entries,
            config.cache_max_memory_bytes(),
            config.default_ttl,
        );
        let limits = DefaultLimits {
            max_requests: config.rate_limit_max_requests,
            window_seconds: config.rate_limit_window,
            idle_seconds: config.rate_limit_idle_secs,
        };
        Self::new(cache, RateLimiter::new(), limits)
    }
}

// == Cache Handlers ==

/// Handler for PUT /cache/entries
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    match req.ttl {
        Some(ttl) => state.cache.set(req.key.clone(), req.value, ttl),
        None => state.cache.set_default(req.key.clone(), req.value),
    }

    Ok(Json(KeyResponse::set(req.key)))
}

/// Handler for GET /cache/entries/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get(&key)
        .ok_or_else(|| ApiError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/entries/:key
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    if !state.cache.invalidate(&key) {
        return Err(ApiError::NotFound(key));
    }

    Ok(Json(KeyResponse::invalidated(key)))
}

/// Handler for GET /cache/entries/:key/info
pub async fn info_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryInfo>> {
    state
        .cache
        .get_info(&key)
        .map(Json)
        .ok_or(ApiError::NotFound(key))
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidatePatternRequest>,
) -> Result<Json<RemovedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let removed = state.cache.invalidate_pattern(&req.pattern);
    Ok(Json(RemovedResponse::new(
        format!("Invalidated keys containing '{}'", req.pattern),
        removed,
    )))
}

/// Handler for GET /cache/top
pub async fn top_keys_handler(
    State(state): State<AppState>,
    Query(query): Query<TopKeysQuery>,
) -> Json<Vec<TopKey>> {
    Json(state.cache.get_top_keys(query.limit))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsSnapshot> {
    Json(state.cache.get_stats())
}

/// Handler for POST /cache/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.clear();
    Json(RemovedResponse::new("Cache cleared", removed))
}

/// Handler for POST /cache/cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.cleanup();
    info!(removed, "manual cache cleanup");
    Json(RemovedResponse::new("Expired entries removed", removed))
}

// == Rate Limit Handlers ==

/// Handler for POST /ratelimit/check
pub async fn rate_check_handler(
    State(state): State<AppState>,
    Json(req): Json<RateLimitCheckRequest>,
) -> Json<RateLimitDecision> {
    let max_requests = req.max_requests.unwrap_or(state.limits.max_requests);
    let window_seconds = req.window_seconds.unwrap_or(state.limits.window_seconds);

    let decision = match req.action.as_deref() {
        Some(action) => {
            state
                .limiter
                .check_action_limit(req.user_id, action, max_requests, window_seconds)
        }
        None => state
            .limiter
            .check_rate_limit(req.user_id, max_requests, window_seconds),
    };

    Json(decision)
}

/// Handler for GET /ratelimit/users/:user_id
pub async fn user_stats_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Json<UserLimitStats> {
    Json(state.limiter.get_stats(user_id))
}

/// Handler for DELETE /ratelimit/users/:user_id
pub async fn reset_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Json<UserLimitStats> {
    state.limiter.reset_user(user_id);
    Json(state.limiter.get_stats(user_id))
}

/// Handler for POST /ratelimit/cleanup
pub async fn stale_users_handler(
    State(state): State<AppState>,
    Json(req): Json<StaleUsersRequest>,
) -> Json<RemovedResponse> {
    let idle_seconds = req.idle_seconds.unwrap_or(state.limits.idle_seconds);
    let removed = state.limiter.cleanup_stale_users(idle_seconds);
    Json(RemovedResponse::new(
        format!("Dropped users idle for more than {}s", idle_seconds),
        removed,
    ))
}

/// Handler for GET /ratelimit/summary
pub async fn limiter_summary_handler(State(state): State<AppState>) -> Json<LimiterSummary> {
    Json(state.limiter.summary())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
