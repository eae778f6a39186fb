//! Configuration types for scanning.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ScanError};

/// Browser-like user agent sent with every request.
///
/// Plenty of small-business hosts reject unknown bots outright, which would
/// otherwise show up as false "Inactive" results.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for a batch scan.
///
/// Passed explicitly into [`crate::BatchScanner`] and [`crate::HttpFetcher`]
/// at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of domains scanned at once.
    ///
    /// Values below 1 are treated as 1. Default: 5.
    pub concurrency: usize,

    /// Per-request timeout covering connect, redirects and body read.
    ///
    /// Default: 8 seconds.
    pub request_timeout: Duration,

    /// Maximum redirects followed per request. Default: 5.
    pub max_redirects: usize,

    /// User-Agent header value.
    pub user_agent: String,

    /// Bodies are truncated to this many bytes. Default: 2 MiB.
    pub max_body_bytes: usize,

    /// Body-text heuristics only run on bodies shorter than this many
    /// characters, so minified SPA shells are not misclassified.
    ///
    /// Default: 50 000.
    pub classify_body_limit: usize,

    /// Try every scheme/www candidate URL until one returns a non-empty
    /// body. When false only `https://{domain}` is fetched.
    ///
    /// Default: true.
    pub try_all_candidates: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            request_timeout: Duration::from_secs(8),
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: 2 * 1024 * 1024,
            classify_body_limit: 50_000,
            try_all_candidates: true,
        }
    }
}

impl ScanConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the redirect cap.
    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the body size cap.
    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    /// Set the classification ceiling.
    pub fn with_classify_body_limit(mut self, limit: usize) -> Self {
        self.classify_body_limit = limit;
        self
    }

    /// Only fetch the first candidate URL.
    pub fn first_candidate_only(mut self) -> Self {
        self.try_all_candidates = false;
        self
    }

    /// Concurrency limit with the lower bound applied.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Reject configurations that cannot produce a working scanner.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(ScanError::InvalidConfig {
                reason: "request_timeout must be greater than zero".to_string(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ScanError::InvalidConfig {
                reason: "user_agent must not be empty".to_string(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ScanError::InvalidConfig {
                reason: "max_body_bytes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
