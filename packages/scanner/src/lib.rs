//! Bulk Website Scanner
//!
//! Scans batches of web domains and reports, per domain, whether the site is
//! alive, why it looks inactive or odd, and a best-effort business profile
//! (name, postal address, phone, email, social and Google Business links).
//!
//! # Pipeline
//!
//! ```text
//! raw domain -> resolver -> fetcher -> classifier + extraction -> ScanResult
//! ```
//!
//! Every input produces exactly one [`ScanResult`], in input order. Transport
//! failures, bad markup and even panics inside a single domain's work are
//! folded into that domain's record; nothing in a batch is fatal.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use site_scanner::{BatchScanner, HttpFetcher, ScanConfig};
//!
//! let config = ScanConfig::default().with_concurrency(5);
//! let scanner = BatchScanner::new(Arc::new(HttpFetcher::new(&config)?), config);
//!
//! for result in scanner.scan_batch(&domains).await {
//!     println!("{} {} {}", result.domain, result.status, result.reason);
//! }
//! ```
//!
//! # Modules
//!
//! - [`resolver`] - domain normalization and candidate URLs
//! - [`fetchers`] - HTTP and mock [`Fetcher`] implementations
//! - [`classifier`] - liveness rules
//! - [`extract`] - tiered business profile extraction
//! - [`scanner`] - the concurrent batch scheduler

pub mod classifier;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod resolver;
pub mod scanner;
pub mod traits;
pub mod types;

pub use classifier::{classify, classify_page, Classification};
pub use error::{FailureKind, Result, ScanError};
pub use extract::{ExtractedProfile, ExtractionEngine, Field, FieldResolver, Tier};
pub use fetchers::{HttpFetcher, MockFetcher, MockResponse};
pub use resolver::{normalize_domain, resolve, ResolvedDomain};
pub use scanner::BatchScanner;
pub use traits::fetcher::Fetcher;
pub use types::{
    config::ScanConfig,
    outcome::{FetchOutcome, FetchedPage},
    result::{BusinessProfile, ScanResult, SiteStatus, SocialProfile},
};
