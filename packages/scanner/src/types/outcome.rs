//! Fetch outcomes: the uniform shape every [`crate::Fetcher`] returns.

use std::collections::HashMap;

use crate::error::FailureKind;

/// A response received from a host, whatever its status code.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub requested_url: String,

    /// URL the response was served from, after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Response headers, lower-case names
    pub headers: HashMap<String, String>,

    /// Response body, lossily decoded and capped in size
    pub body: String,
}

impl FetchedPage {
    /// Create a page whose final URL equals the requested URL.
    pub fn new(url: impl Into<String>, status_code: u16, body: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            requested_url: url,
            status_code,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Set the final URL (simulating a redirect).
    pub fn with_final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = final_url.into();
        self
    }

    /// Add a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Check if the body has any non-whitespace content.
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// Check if the status code is in the 2xx/3xx range.
    pub fn is_ok_status(&self) -> bool {
        (200..400).contains(&self.status_code)
    }
}

/// Result of a single fetch attempt. Exactly one variant holds.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Transport-level failure; no HTTP response was received.
    Failure {
        kind: FailureKind,
        detail: String,
    },
    /// A response was received (any status code).
    Success(FetchedPage),
}

impl FetchOutcome {
    /// Build a failure outcome.
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        FetchOutcome::Failure {
            kind,
            detail: detail.into(),
        }
    }

    /// Check whether a response was received.
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// The received page, if any.
    pub fn page(&self) -> Option<&FetchedPage> {
        match self {
            FetchOutcome::Success(page) => Some(page),
            FetchOutcome::Failure { .. } => None,
        }
    }

    /// Whether this outcome ends candidate fallback: a response with a
    /// non-empty body.
    pub fn has_content(&self) -> bool {
        self.page().is_some_and(FetchedPage::has_content)
    }
}
