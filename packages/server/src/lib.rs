// Bulk Website Scanner - HTTP API
//
// Thin axum layer over the `site_scanner` pipeline: parses domain lists,
// applies per-route caps and returns one result record per domain.

pub mod config;
pub mod server;

pub use config::*;
