//! Batch scheduler: runs the per-domain pipeline under a concurrency limit.
//!
//! Each domain is one spawned task holding a semaphore permit. Results are
//! collected by awaiting the task handles in input order, so completion
//! order never leaks into the output and a panicking task still yields a
//! record.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::error::FailureKind;
use crate::extract::ExtractionEngine;
use crate::resolver::{normalize_domain, resolve};
use crate::traits::fetcher::Fetcher;
use crate::types::config::ScanConfig;
use crate::types::outcome::{FetchOutcome, FetchedPage};
use crate::types::result::ScanResult;

/// Reason for input that normalizes to nothing.
pub const INVALID_DOMAIN: &str = "Invalid Domain";

/// Reason for a unit that panicked or could not be scheduled.
pub const INTERNAL_ERROR: &str = "Internal Error";

/// Scans lists of domains.
///
/// Cloning is cheap; clones share the fetcher and extraction engine.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use site_scanner::{BatchScanner, HttpFetcher, ScanConfig};
///
/// let config = ScanConfig::default().with_concurrency(10);
/// let fetcher = HttpFetcher::new(&config)?;
/// let scanner = BatchScanner::new(Arc::new(fetcher), config);
///
/// let results = scanner.scan_batch(&["acme.com".to_string()]).await;
/// ```
#[derive(Clone)]
pub struct BatchScanner {
    fetcher: Arc<dyn Fetcher>,
    engine: Arc<ExtractionEngine>,
    config: Arc<ScanConfig>,
}

impl BatchScanner {
    /// Create a scanner with the standard extraction chain.
    pub fn new(fetcher: Arc<dyn Fetcher>, config: ScanConfig) -> Self {
        Self {
            fetcher,
            engine: Arc::new(ExtractionEngine::new()),
            config: Arc::new(config),
        }
    }

    /// Replace the extraction engine.
    pub fn with_engine(mut self, engine: ExtractionEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan every domain, at most `concurrency` at a time.
    ///
    /// Always returns exactly one result per input, in input order.
    pub async fn scan_batch(&self, domains: &[String]) -> Vec<ScanResult> {
        let concurrency = self.config.effective_concurrency();
        info!(
            domains = domains.len(),
            concurrency,
            fetcher = self.fetcher.name(),
            "Starting batch scan"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut handles = Vec::with_capacity(domains.len());

        for raw in domains {
            let scanner = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let raw = raw.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return ScanResult::unreachable(
                        normalize_domain(&raw).unwrap_or_default(),
                        INTERNAL_ERROR,
                    );
                };
                scanner.scan_domain(&raw).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (raw, handle) in domains.iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(domain = %raw, error = %e, "Scan task failed");
                    results.push(ScanResult::unreachable(
                        normalize_domain(raw).unwrap_or_default(),
                        INTERNAL_ERROR,
                    ));
                }
            }
        }

        let active = results.iter().filter(|r| r.is_active()).count();
        info!(
            domains = results.len(),
            active,
            inactive = results.len() - active,
            "Batch scan complete"
        );

        results
    }

    /// Run the full pipeline for one raw domain.
    pub async fn scan_domain(&self, raw: &str) -> ScanResult {
        let Some(resolved) = resolve(raw) else {
            debug!(input = %raw, "Input does not contain a domain");
            return ScanResult::unreachable("", INVALID_DOMAIN);
        };

        let outcome = self.fetch_first_usable(&resolved.candidates).await;
        let classification = classify(&outcome, self.config.classify_body_limit);

        let mut result = ScanResult::unreachable(resolved.domain, classification.reason);
        result.status = classification.status;
        result.status_code = classification.status_code;

        match &outcome {
            FetchOutcome::Success(page) => {
                result.final_url = page.final_url.clone();
                if page.has_content() {
                    let extracted = self.engine.extract(&page.body, &page.final_url);
                    result.profile = extracted.profile;
                    result.social = extracted.social;
                }
            }
            FetchOutcome::Failure { kind, detail } => {
                warn!(domain = %result.domain, kind = %kind, detail = %detail, "Domain unreachable");
            }
        }

        debug!(
            domain = %result.domain,
            status = %result.status,
            status_code = result.status_code,
            reason = %result.reason,
            "Domain scanned"
        );
        result
    }

    /// Fetch candidates in order until one returns a non-empty body.
    ///
    /// Falls back to the first response received (even an empty one), then
    /// to the first failure.
    async fn fetch_first_usable(&self, candidates: &[String]) -> FetchOutcome {
        let limit = if self.config.try_all_candidates {
            candidates.len()
        } else {
            1
        };

        let mut first_response: Option<FetchedPage> = None;
        let mut first_failure: Option<FetchOutcome> = None;

        for url in candidates.iter().take(limit) {
            debug!(url = %url, "Fetching candidate");
            match self.fetch_guarded(url).await {
                FetchOutcome::Success(page) if page.has_content() => {
                    return FetchOutcome::Success(page);
                }
                FetchOutcome::Success(page) => {
                    debug!(url = %url, status = page.status_code, "Empty body, trying next candidate");
                    first_response.get_or_insert(page);
                }
                FetchOutcome::Failure { kind, detail } => {
                    debug!(url = %url, kind = %kind, "Candidate failed");
                    first_failure.get_or_insert(FetchOutcome::Failure { kind, detail });
                }
            }
        }

        match (first_response, first_failure) {
            (Some(page), _) => FetchOutcome::Success(page),
            (None, Some(failure)) => failure,
            (None, None) => FetchOutcome::failure(FailureKind::Unknown, "no candidate URLs"),
        }
    }

    /// Fetch with a hard deadline so a stuck fetcher cannot stall its unit.
    async fn fetch_guarded(&self, url: &str) -> FetchOutcome {
        match tokio::time::timeout(self.config.request_timeout, self.fetcher.fetch(url)).await {
            Ok(outcome) => outcome,
            Err(_) => FetchOutcome::failure(
                FailureKind::TimedOut,
                format!("no response within {:?}", self.config.request_timeout),
            ),
        }
    }
}
