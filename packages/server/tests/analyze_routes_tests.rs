//! Route tests for the scan endpoints, driven by a scripted fetcher.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use server_core::server::{build_app, AppState};
use site_scanner::{BatchScanner, FailureKind, MockFetcher, ScanConfig};
use tower::ServiceExt;

fn app(mock: &MockFetcher) -> Router {
    let scanner = BatchScanner::new(Arc::new(mock.clone()), ScanConfig::default());
    build_app(AppState::new(scanner).with_caps(3, 2), &[])
}

async fn post_json(app: Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_bulk_analyze_returns_results_in_order() {
    let mock = MockFetcher::new()
        .with_page("https://acme.com", 200, "<title>Acme Co | Home</title>")
        .with_page("https://gone.com", 404, "Not Found")
        .with_failure("https://dead.com", FailureKind::DnsNotFound);

    let (status, body) = post_json(
        app(&mock),
        "/bulk-analyze",
        r#"{"domains": ["https://acme.com/", "gone.com", "dead.com"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["domain"], "acme.com");
    assert_eq!(results[0]["status"], "Active");
    assert_eq!(results[0]["statusCode"], 200);
    assert_eq!(results[0]["profile"]["name"], "Acme Co");

    assert_eq!(results[1]["domain"], "gone.com");
    assert_eq!(results[1]["status"], "Inactive");
    assert_eq!(results[1]["reason"], "HTTP 404");

    assert_eq!(results[2]["statusCode"], 0);
    assert_eq!(results[2]["reason"], "DNS Not Found");
    assert_eq!(results[2]["social"]["facebook"], "");
}

#[tokio::test]
async fn test_missing_domains_is_bad_request() {
    let mock = MockFetcher::new();
    for body in [r#"{}"#, r#"{"domains": "acme.com"}"#, r#"{"domains": []}"#, "not json"] {
        let (status, json) = post_json(app(&mock), "/bulk-analyze", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(json, json!({"error": "Domains array required"}));
    }
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_lists_are_truncated_to_route_cap() {
    let mock = MockFetcher::new();
    let body = r#"{"domains": ["a.com", "b.com", "c.com", "d.com", "e.com"]}"#;

    let (status, bulk) = post_json(app(&mock), "/bulk-analyze", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bulk.as_array().unwrap().len(), 3);

    let (status, batch) = post_json(app(&mock), "/batch-scan", body).await;
    assert_eq!(status, StatusCode::OK);
    let batch = batch.as_array().unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0]["domain"], "a.com");
    assert_eq!(batch[1]["domain"], "b.com");
}

#[tokio::test]
async fn test_non_string_items_still_get_records() {
    let mock = MockFetcher::new();
    let (status, body) = post_json(app(&mock), "/batch-scan", r#"{"domains": [null, "  "]}"#).await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["domain"], "null");
    assert_eq!(results[0]["status"], "Inactive");
    assert_eq!(results[1]["domain"], "");
    assert_eq!(results[1]["reason"], "Invalid Domain");
}

#[tokio::test]
async fn test_root_and_health() {
    let mock = MockFetcher::new();

    let (status, root) = get_json(app(&mock), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root, json!({"status": "ok"}));

    let (status, health) = get_json(app(&mock), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["concurrency"], 5);
    assert_eq!(health["bulkAnalyzeMaxDomains"], 3);
    assert_eq!(health["batchScanMaxDomains"], 2);
}
