//! Mock fetcher for testing.
//!
//! Provides a scriptable implementation of the Fetcher trait that never
//! touches the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::FailureKind;
use crate::traits::fetcher::Fetcher;
use crate::types::outcome::{FetchOutcome, FetchedPage};

/// Scripted behaviour for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return the outcome immediately.
    Immediate(FetchOutcome),
    /// Sleep, then return the outcome.
    Delayed(Duration, FetchOutcome),
    /// Never complete.
    Hang,
    /// Panic inside the fetch.
    Panic,
}

/// Mock fetcher for testing.
///
/// URLs without a scripted response fail with `DNS Not Found`, so a test
/// only needs to script the candidates it cares about.
///
/// # Example
///
/// ```rust
/// use site_scanner::fetchers::MockFetcher;
///
/// let mock = MockFetcher::new()
///     .with_page("https://acme.com", 200, "<title>Acme</title>")
///     .with_page("https://gone.com", 404, "Not Found");
/// ```
#[derive(Default)]
pub struct MockFetcher {
    /// Scripted responses indexed by URL
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    /// Every URL fetched, in call order
    calls: Arc<RwLock<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a URL.
    pub fn add_response(&self, url: impl Into<String>, response: MockResponse) {
        let mut responses = self.responses.write().unwrap();
        responses.insert(url.into(), response);
    }

    /// Script a response (builder pattern).
    pub fn with_response(self, url: impl Into<String>, response: MockResponse) -> Self {
        self.add_response(url, response);
        self
    }

    /// Script an immediate successful response.
    pub fn with_page(self, url: &str, status_code: u16, body: impl Into<String>) -> Self {
        let page = FetchedPage::new(url, status_code, body);
        self.with_response(url, MockResponse::Immediate(FetchOutcome::Success(page)))
    }

    /// Script an immediate transport failure.
    pub fn with_failure(self, url: &str, kind: FailureKind) -> Self {
        self.with_response(
            url,
            MockResponse::Immediate(FetchOutcome::failure(kind, format!("mock {}", kind))),
        )
    }

    /// Script a URL that never answers.
    pub fn with_hang(self, url: &str) -> Self {
        self.with_response(url, MockResponse::Hang)
    }

    /// Get the number of fetches made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Get the URLs fetched, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Highest number of fetches that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Clear all recorded calls and counters.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
        self.max_in_flight.store(0, Ordering::SeqCst);
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            calls: Arc::clone(&self.calls),
            in_flight: Arc::clone(&self.in_flight),
            max_in_flight: Arc::clone(&self.max_in_flight),
        }
    }
}

/// Decrements the in-flight counter even when the fetch future is dropped.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        self.calls.write().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        let response = self.responses.read().unwrap().get(url).cloned();

        match response {
            Some(MockResponse::Immediate(outcome)) => outcome,
            Some(MockResponse::Delayed(delay, outcome)) => {
                tokio::time::sleep(delay).await;
                outcome
            }
            Some(MockResponse::Hang) => std::future::pending().await,
            Some(MockResponse::Panic) => panic!("mock fetcher panic for {}", url),
            None => FetchOutcome::failure(FailureKind::DnsNotFound, "mock: no response scripted"),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
