use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    concurrency: usize,
    bulk_analyze_max_domains: usize,
    batch_scan_max_domains: usize,
}

/// Liveness check
pub async fn root_handler() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

/// Health check endpoint
///
/// The scanner has no backing services, so this only reports the
/// configuration it is running with.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        concurrency: state.scanner.config().effective_concurrency(),
        bulk_analyze_max_domains: state.bulk_analyze_max_domains,
        batch_scan_max_domains: state.batch_scan_max_domains,
    })
}
