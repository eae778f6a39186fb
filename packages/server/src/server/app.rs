//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use site_scanner::BatchScanner;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::routes::{batch_scan_handler, bulk_analyze_handler, health_handler, root_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<BatchScanner>,
    pub bulk_analyze_max_domains: usize,
    pub batch_scan_max_domains: usize,
}

impl AppState {
    pub fn new(scanner: BatchScanner) -> Self {
        Self {
            scanner: Arc::new(scanner),
            bulk_analyze_max_domains: 50,
            batch_scan_max_domains: 5,
        }
    }

    pub fn with_caps(mut self, bulk_analyze: usize, batch_scan: usize) -> Self {
        self.bulk_analyze_max_domains = bulk_analyze;
        self.batch_scan_max_domains = batch_scan;
        self
    }
}

/// Build the Axum application router
///
/// An empty `allowed_origins` list allows any origin.
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(allowed_origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/bulk-analyze", post(bulk_analyze_handler))
        .route("/batch-scan", post(batch_scan_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parsed)
    }
}
