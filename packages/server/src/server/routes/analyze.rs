use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use site_scanner::ScanResult;

use crate::server::app::AppState;

const DOMAINS_REQUIRED: &str = "Domains array required";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ScanResponse = Result<Json<Vec<ScanResult>>, (StatusCode, Json<ErrorResponse>)>;

/// Scan a list of domains in one request.
///
/// Body: `{ "domains": ["acme.com", ...] }`. Lists longer than the
/// configured cap are truncated.
pub async fn bulk_analyze_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ScanResponse {
    let cap = state.bulk_analyze_max_domains;
    scan(&state, payload, cap, "/bulk-analyze").await
}

/// Same contract as [`bulk_analyze_handler`] with a smaller cap, for
/// callers that submit progressive batches.
pub async fn batch_scan_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ScanResponse {
    let cap = state.batch_scan_max_domains;
    scan(&state, payload, cap, "/batch-scan").await
}

async fn scan(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
    cap: usize,
    route: &'static str,
) -> ScanResponse {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(route, error = %rejection, "Rejected request body");
            return Err(bad_request());
        }
    };

    let Some(mut domains) = parse_domains(&body) else {
        return Err(bad_request());
    };

    if domains.len() > cap {
        tracing::warn!(route, requested = domains.len(), cap, "Truncating domain list to cap");
        domains.truncate(cap);
    }

    Ok(Json(state.scanner.scan_batch(&domains).await))
}

/// Domain strings from a request body. `None` unless `domains` is a
/// non-empty array.
///
/// Non-string items are kept as their JSON text so every item still gets a
/// result record.
pub fn parse_domains(body: &Value) -> Option<Vec<String>> {
    let items = body.get("domains")?.as_array()?;
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

fn bad_request() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: DOMAINS_REQUIRED.to_string(),
        }),
    )
}
