//! Health Check and Metrics API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::TestApp;

/// Test basic health check endpoint returns 200 OK
#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

/// Liveness never depends on storage
#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new().await;

    let response = app.get("/health/live").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "alive");
}

/// The in-memory backend is always ready
#[tokio::test]
async fn test_readiness_probe() {
    let app = TestApp::new().await;

    let response = app.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["checks"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_expose_http_and_booking_counters() {
    let app = TestApp::new().await;
    app.get("/health").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    let text = response.body.as_str().unwrap();
    assert!(text.contains("rental_marketplace_http_requests_total"));
    assert!(text.contains("path=\"/health\""));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/nothing-here").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
