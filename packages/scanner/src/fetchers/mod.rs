//! Fetcher implementations.
//!
//! # Available Fetchers
//!
//! - `HttpFetcher` - reqwest-backed, used in production
//! - `MockFetcher` - scripted responses for tests

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::{MockFetcher, MockResponse};

// Re-export from traits for convenience
pub use crate::traits::fetcher::Fetcher;
