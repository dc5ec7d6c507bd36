//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bucket_cache::{api::create_router, AppState, FixedClock, MemoryObjectStore, ObjectStoreCache};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::at_timestamp(1_700_000_000));
    let store = Arc::new(MemoryObjectStore::new("it-bucket"));
    let state = AppState::new(ObjectStoreCache::new(store, clock.clone()));
    (create_router(state), clock)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == Single Key Endpoints ==

#[tokio::test]
async fn test_set_then_get() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(put("/cache/get_key", r#"{"value":"get_value"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["stored"], true);

    let response = app.oneshot(get("/cache/get_key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
}

#[tokio::test]
async fn test_get_missing_is_404() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get("/cache/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_ttl_expiry_and_exists_asymmetry() {
    let (app, clock) = create_test_app();

    app.clone()
        .oneshot(put("/cache/session.1", r#"{"value":"token","ttl":5}"#))
        .await
        .unwrap();

    clock.advance(Duration::seconds(4));
    let response = app.clone().oneshot(get("/cache/session.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    clock.advance(Duration::seconds(1));
    let response = app.clone().oneshot(get("/cache/session.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/cache/session.1/exists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["exists"], true);
}

#[tokio::test]
async fn test_non_string_value_is_not_stored() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(put("/cache/num", r#"{"value":{"n":1}}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["stored"], false);

    let response = app.oneshot(get("/cache/num/exists")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_invalid_key_is_400() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(put("/cache/bad%20key", r#"{"value":"v"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let long = "k".repeat(65);
    let response = app.oneshot(get(&format!("/cache/{}", long))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_ttl_is_400_and_writes_nothing() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(put("/cache/k", r#"{"value":"v","ttl":-5}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/cache/k/exists")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["exists"], false);
}

#[tokio::test]
async fn test_delete_reports_whether_removed() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(put("/cache/gone", r#"{"value":"v"}"#))
        .await
        .unwrap();

    let response = app.clone().oneshot(delete("/cache/gone")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["deleted"], true);

    let response = app.oneshot(delete("/cache/gone")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["deleted"], false);
}

#[tokio::test]
async fn test_clear_is_not_implemented() {
    let (app, _) = create_test_app();

    let response = app.oneshot(delete("/cache")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

// == Batch Endpoints ==

#[tokio::test]
async fn test_batch_get_fills_missing_with_null() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(put("/cache/k1", r#"{"value":"one"}"#))
        .await
        .unwrap();

    let response = app
        .oneshot(post("/batch/get", r#"{"keys":["k1","k2"]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["values"]["k1"], "one");
    assert!(json["values"]["k2"].is_null());
}

#[tokio::test]
async fn test_batch_set_stops_at_first_failure() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(post(
            "/batch/set",
            r#"{"values":[["a","1"],["b",2],["c","3"]]}"#,
        ))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["stored"], false);

    let response = app.clone().oneshot(get("/cache/a/exists")).await.unwrap();
    assert_eq!(body_to_json(response.into_body()).await["exists"], true);

    let response = app.oneshot(get("/cache/c/exists")).await.unwrap();
    assert_eq!(body_to_json(response.into_body()).await["exists"], false);
}

#[tokio::test]
async fn test_batch_delete() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(post("/batch/set", r#"{"values":{"x":"1","y":"2"},"ttl":60}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post("/batch/delete", r#"{"keys":["x","y"]}"#))
        .await
        .unwrap();
    assert_eq!(body_to_json(response.into_body()).await["deleted"], true);

    let response = app
        .oneshot(post("/batch/delete", r#"{"keys":["x"]}"#))
        .await
        .unwrap();
    assert_eq!(body_to_json(response.into_body()).await["deleted"], false);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["bucket"], "it-bucket");
}
