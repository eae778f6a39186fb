//! Fetcher trait: the network seam of the scan pipeline.
//!
//! A fetcher performs exactly one bounded-time GET and reports what
//! happened. It never retries; falling back to another candidate URL is the
//! scanner's job.
//!
//! # Usage
//!
//! ```rust,ignore
//! use site_scanner::{Fetcher, FetchOutcome, HttpFetcher, ScanConfig};
//!
//! let fetcher = HttpFetcher::new(&ScanConfig::default())?;
//! match fetcher.fetch("https://example.com").await {
//!     FetchOutcome::Success(page) => println!("{} bytes", page.body.len()),
//!     FetchOutcome::Failure { kind, .. } => println!("failed: {kind}"),
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::outcome::FetchOutcome;

/// Performs a single HTTP GET and classifies the result.
///
/// Implementations must treat every HTTP status code as
/// [`FetchOutcome::Success`]; only transport failures produce
/// [`FetchOutcome::Failure`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch one absolute URL.
    async fn fetch(&self, url: &str) -> FetchOutcome;

    /// Get the fetcher name (for logging).
    fn name(&self) -> &str;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
