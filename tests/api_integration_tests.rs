//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against the admin router.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use storefront_guard::{
    api::{create_router, DefaultLimits},
    cache::json_size,
    clock::ManualClock,
    AppState, CacheManager, RateLimiter,
};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_state() -> (AppState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let cache: CacheManager =
        CacheManager::with_parts(100, 1024 * 1024, 300, clock.clone(), Arc::new(json_size));
    let limiter = RateLimiter::with_clock(clock.clone());
    let limits = DefaultLimits {
        max_requests: 3,
        window_seconds: 60,
        idle_seconds: 3600,
    };
    (AppState::new(cache, limiter, limits), clock)
}

fn create_test_app() -> Router {
    create_router(create_test_state().0)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_set_and_get_roundtrip() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/cache/entries",
        Some(json!({"key": "catalog:page:1", "value": [{"id": 1, "name": "Tea"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("catalog:page:1"));

    let (status, json) = send(&app, "GET", "/cache/entries/catalog:page:1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"][0]["name"], "Tea");
}

#[tokio::test]
async fn test_set_empty_key_rejected() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/cache/entries",
        Some(json!({"key": "", "value": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_ttl_expiry_counts_expiration_once() {
    let (state, clock) = create_test_state();
    let app = create_router(state);

    send(
        &app,
        "PUT",
        "/cache/entries",
        Some(json!({"key": "cart:7", "value": {"items": 2}, "ttl": 1})),
    )
    .await;
    clock.advance_secs(2);

    let (status, _) = send(&app, "GET", "/cache/entries/cart:7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/cache/entries/cart:7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["expirations"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["hits"], 0);
}

#[tokio::test]
async fn test_invalidate_and_pattern_invalidate() {
    let app = create_test_app();
    for key in ["cart:1", "cart:2", "orders:1"] {
        send(
            &app,
            "PUT",
            "/cache/entries",
            Some(json!({"key": key, "value": true})),
        )
        .await;
    }

    let (status, _) = send(&app, "DELETE", "/cache/entries/orders:1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", "/cache/entries/orders:1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &app,
        "POST",
        "/cache/invalidate",
        Some(json!({"pattern": "cart:"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 2);

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["invalidations"], 3);
    assert_eq!(stats["cache_size"], 0);
}

#[tokio::test]
async fn test_empty_pattern_rejected() {
    let app = create_test_app();
    let (status, _) = send(&app, "POST", "/cache/invalidate", Some(json!({"pattern": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_info_top_keys_and_stats() {
    let app = create_test_app();
    for key in ["a", "b"] {
        send(
            &app,
            "PUT",
            "/cache/entries",
            Some(json!({"key": key, "value": "x", "ttl": 0})),
        )
        .await;
    }
    send(&app, "GET", "/cache/entries/b", None).await;
    send(&app, "GET", "/cache/entries/b", None).await;
    send(&app, "GET", "/cache/entries/missing", None).await;

    let (status, info) = send(&app, "GET", "/cache/entries/b/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["hit_count"], 2);
    assert_eq!(info["ttl_secs"], 0);
    assert_eq!(info["size_bytes"], 3);
    assert_eq!(info["expired"], false);

    let (status, top) = send(&app, "GET", "/cache/top?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top, json!([{"key": "b", "hit_count": 2}]));

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["hits"], 2);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["sets"], 2);
    let hit_rate = stats["hit_rate"].as_f64().unwrap();
    assert!((hit_rate - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_clear_and_cleanup() {
    let (state, clock) = create_test_state();
    let app = create_router(state);
    send(
        &app,
        "PUT",
        "/cache/entries",
        Some(json!({"key": "short", "value": 1, "ttl": 5})),
    )
    .await;
    send(
        &app,
        "PUT",
        "/cache/entries",
        Some(json!({"key": "long", "value": 1, "ttl": 500})),
    )
    .await;
    clock.advance_secs(10);

    let (_, json) = send(&app, "POST", "/cache/cleanup", None).await;
    assert_eq!(json["removed"], 1);

    let (_, json) = send(&app, "POST", "/cache/clear", None).await;
    assert_eq!(json["removed"], 1);

    let (_, stats) = send(&app, "GET", "/cache/stats", None).await;
    assert_eq!(stats["cache_size"], 0);
    assert_eq!(stats["sets"], 2);
    assert_eq!(stats["expirations"], 1);
}

// == Rate Limit Endpoint Tests ==

#[tokio::test]
async fn test_rate_limit_flow() {
    let (state, clock) = create_test_state();
    let app = create_router(state);
    let check = json!({"user_id": 42});

    for _ in 0..3 {
        let (_, decision) = send(&app, "POST", "/ratelimit/check", Some(check.clone())).await;
        assert_eq!(decision["allowed"], true);
    }

    let (_, decision) = send(&app, "POST", "/ratelimit/check", Some(check.clone())).await;
    assert_eq!(decision["allowed"], false);
    assert_eq!(decision["show_alert"], true);
    assert!(decision["retry_after_secs"].as_u64().unwrap() > 0);

    let (_, decision) = send(&app, "POST", "/ratelimit/check", Some(check.clone())).await;
    assert_eq!(decision["show_alert"], false);

    clock.advance_secs(60);
    let (_, decision) = send(&app, "POST", "/ratelimit/check", Some(check)).await;
    assert_eq!(decision["allowed"], true);
}

#[tokio::test]
async fn test_rate_limit_action_stats_and_reset() {
    let app = create_test_app();
    let action = json!({"user_id": 9, "action": "checkout", "max_requests": 1, "window_seconds": 30});

    let (_, decision) = send(&app, "POST", "/ratelimit/check", Some(action.clone())).await;
    assert_eq!(decision["allowed"], true);
    let (_, decision) = send(&app, "POST", "/ratelimit/check", Some(action.clone())).await;
    assert_eq!(decision["allowed"], false);
    assert_eq!(decision["retry_after_secs"], 30);

    let (status, stats) = send(&app, "GET", "/ratelimit/users/9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["action_requests"]["checkout"], 1);
    assert_eq!(stats["general_requests"], 0);

    let (status, stats) = send(&app, "DELETE", "/ratelimit/users/9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["action_requests"], json!({}));
    assert_eq!(stats["last_alert_secs_ago"], Value::Null);

    let (_, decision) = send(&app, "POST", "/ratelimit/check", Some(action)).await;
    assert_eq!(decision["allowed"], true);
}

#[tokio::test]
async fn test_stale_user_cleanup_and_summary() {
    let (state, clock) = create_test_state();
    let app = create_router(state);

    send(&app, "POST", "/ratelimit/check", Some(json!({"user_id": 1}))).await;
    clock.advance_secs(4000);
    send(&app, "POST", "/ratelimit/check", Some(json!({"user_id": 2}))).await;

    let (_, summary) = send(&app, "GET", "/ratelimit/summary", None).await;
    assert_eq!(summary["tracked_users"], 2);

    let (_, json) = send(&app, "POST", "/ratelimit/cleanup", Some(json!({}))).await;
    assert_eq!(json["removed"], 1);

    let (_, summary) = send(&app, "GET", "/ratelimit/summary", None).await;
    assert_eq!(summary["tracked_users"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
