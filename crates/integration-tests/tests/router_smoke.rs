//! Router smoke tests.
//!
//! These drive the full API router with `tower::ServiceExt::oneshot` and a
//! lazy pool that never connects, so they cover everything that happens
//! before a query: route matching, extractor rejections, and input
//! validation that fails ahead of the first database call.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use stockroom_integration_tests::lazy_state;
use stockroom_server::routes;

fn app() -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .with_state(lazy_state())
}

fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Route Matching
// =============================================================================

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/warehouses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_returns_405() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri("/api/items")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_detail_rejects_delete() {
    // Requests are append-only history; there is no delete route
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/requests/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Extractor Rejections
// =============================================================================

#[tokio::test]
async fn test_non_numeric_item_id_returns_400() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/items/widget")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_content_type_returns_415() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/items")
                .body(Body::from(r#"{"name":"Widget"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let response = app()
        .oneshot(json_request(Method::POST, "/api/items", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_required_field_returns_422() {
    // Valid JSON, but CreateItemInput requires a name
    let response = app()
        .oneshot(json_request(Method::POST, "/api/items", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_non_numeric_list_limit_returns_400() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/requests?limit=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Validation Failures Use the Envelope
// =============================================================================

#[tokio::test]
async fn test_blank_item_name_rejected_with_envelope() {
    let response = app()
        .oneshot(json_request(Method::POST, "/api/items", r#"{"name":"   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["message"], "Invalid value: name must not be empty");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_zero_quantity_deposit_rejected() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/items/1/deposit",
            r#"{"quantity":0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid value: quantity must be positive");
}

#[tokio::test]
async fn test_zero_quantity_request_rejected() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/requests",
            r#"{"userId":1,"itemId":1,"quantity":0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid value: quantity must be positive");
}

#[tokio::test]
async fn test_inverted_series_range_rejected() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/series",
            r#"{"itemId":1,"from":"10","to":"2","type":"deposit"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Invalid range: range start 00010 is greater than range end 00002"
    );
}

#[tokio::test]
async fn test_series_bounds_accept_numbers_and_strings() {
    // Mixed bound types must deserialize; an inverted pair proves the
    // numeric bound was parsed without reaching the database
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/series",
            r#"{"itemId":1,"from":10,"to":"2","type":"deposit"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Invalid range: range start 00010 is greater than range end 00002"
    );
}

#[tokio::test]
async fn test_bulk_approve_routes_ahead_of_request_id() {
    // "/requests/bulk/approve" must hit the bulk handler, not parse
    // "bulk" as a request id; the envelope message proves which ran
    let response = app()
        .oneshot(json_request(
            Method::PUT,
            "/api/requests/bulk/approve",
            r#"{"ids":[]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["message"], "Invalid value: ids must not be empty");
}
