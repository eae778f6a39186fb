//! Typed errors for the scanner library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Transport failures are
//! not errors here: they are recovered into [`FailureKind`] and end up as a
//! reason string on the scan result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while setting up a scan.
///
/// Nothing that happens while scanning an individual domain surfaces as a
/// `ScanError`; those are folded into the domain's result instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Configuration values are out of range
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}

/// Classification of a transport-level fetch failure.
///
/// HTTP error statuses are never a `FailureKind`; a 404 is a successful fetch
/// as far as the transport is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Host name did not resolve
    DnsNotFound,
    /// TCP connection actively refused
    ConnectionRefused,
    /// Request or body read exceeded the timeout
    TimedOut,
    /// Certificate invalid/expired or TLS handshake failure
    SslError,
    /// Anything else
    Unknown,
}

/// Maximum number of characters of diagnostic text kept for unknown errors.
pub const MAX_ERROR_DETAIL_CHARS: usize = 60;

impl FailureKind {
    /// Fixed reason label for this failure class.
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::DnsNotFound => "DNS Not Found",
            FailureKind::ConnectionRefused => "Connection Refused",
            FailureKind::TimedOut => "Timed Out",
            FailureKind::SslError => "SSL Error",
            FailureKind::Unknown => "Unknown Error",
        }
    }

    /// Reason string for a scan result.
    ///
    /// Only `Unknown` carries the diagnostic detail, truncated to
    /// [`MAX_ERROR_DETAIL_CHARS`].
    pub fn reason(&self, detail: &str) -> String {
        match self {
            FailureKind::Unknown => {
                let detail = truncate_chars(detail.trim(), MAX_ERROR_DETAIL_CHARS);
                if detail.is_empty() {
                    self.label().to_string()
                } else {
                    format!("{}: {}", self.label(), detail)
                }
            }
            _ => self.label().to_string(),
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Truncate on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Result type alias for scanner setup operations.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_reasons_ignore_detail() {
        assert_eq!(
            FailureKind::DnsNotFound.reason("failed to lookup address"),
            "DNS Not Found"
        );
        assert_eq!(FailureKind::TimedOut.reason(""), "Timed Out");
        assert_eq!(FailureKind::SslError.reason("bad cert"), "SSL Error");
    }

    #[test]
    fn test_unknown_reason_is_truncated() {
        let detail = "x".repeat(200);
        let reason = FailureKind::Unknown.reason(&detail);
        assert_eq!(reason, format!("Unknown Error: {}", "x".repeat(60)));
    }

    #[test]
    fn test_unknown_reason_without_detail() {
        assert_eq!(FailureKind::Unknown.reason("   "), "Unknown Error");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
