// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{
    server::{build_app, AppState},
    Config,
};
use site_scanner::{BatchScanner, HttpFetcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,site_scanner=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bulk Website Scanner API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        concurrency = config.scan_concurrency,
        timeout_secs = config.scan_timeout_secs,
        "Configuration loaded"
    );

    // Build scanner
    let scan_config = config.scan_config();
    let fetcher = HttpFetcher::new(&scan_config).context("Failed to create HTTP fetcher")?;
    let scanner = BatchScanner::new(Arc::new(fetcher), scan_config);

    // Build application
    let state = AppState::new(scanner)
        .with_caps(config.bulk_analyze_max_domains, config.batch_scan_max_domains);
    let app = build_app(state, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
