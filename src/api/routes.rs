//! API Routes
//!
//! Configures the Axum router with the admin endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, cleanup_handler, clear_handler, get_handler, health_handler,
    info_handler, invalidate_handler, invalidate_pattern_handler, limiter_summary_handler,
    rate_check_handler, reset_user_handler, set_handler, stale_users_handler, top_keys_handler,
    user_stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache/entries", put(set_handler))
        .route(
            "/cache/entries/:key",
            get(get_handler).delete(invalidate_handler),
        )
        .route("/cache/entries/:key/info", get(info_handler))
        .route("/cache/invalidate", post(invalidate_pattern_handler))
        .route("/cache/top", get(top_keys_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/clear", post(clear_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/ratelimit/check", post(rate_check_handler))
        .route(
            "/ratelimit/users/:user_id",
            get(user_stats_handler).delete(reset_user_handler),
        )
        .route("/ratelimit/cleanup", post(stale_users_handler))
        .route("/ratelimit/summary", get(limiter_summary_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DefaultLimits;
    use crate::cache::CacheManager;
    use crate::ratelimit::RateLimiter;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(
            CacheManager::new(100, 1024 * 1024, 300),
            RateLimiter::new(),
            DefaultLimits::default(),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_set_endpoint() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/cache/entries")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"key":"catalog:1","value":"tea"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/cache/entries/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_stats_rejects_non_numeric_id() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/ratelimit/users/alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
