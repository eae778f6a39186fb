//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::io;
use tracing::{debug, warn};

use crate::error::{FailureKind, Result};
use crate::traits::fetcher::Fetcher;
use crate::types::config::ScanConfig;
use crate::types::outcome::{FetchOutcome, FetchedPage};

/// Fetches pages over HTTP with a browser-like header set.
///
/// Timeout, redirect cap and user agent come from [`ScanConfig`]. All status
/// codes are returned as [`FetchOutcome::Success`].
///
/// # Example
///
/// ```rust,ignore
/// use site_scanner::{HttpFetcher, ScanConfig};
///
/// let fetcher = HttpFetcher::new(&ScanConfig::default())?;
/// let outcome = fetcher.fetch("https://example.com").await;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Create a fetcher from scan configuration.
    pub fn new(config: &ScanConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn read_body(
        &self,
        mut response: reqwest::Response,
    ) -> std::result::Result<String, reqwest::Error> {
        let mut body: Vec<u8> = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            let remaining = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                debug!(limit = self.max_body_bytes, "Body truncated at size cap");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!(url = %url, "HTTP fetch starting");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return failure_from(url, &e),
        };

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = match self.read_body(response).await {
            Ok(body) => body,
            Err(e) => return failure_from(url, &e),
        };

        debug!(
            url = %url,
            final_url = %final_url,
            status = status_code,
            content_length = body.len(),
            "HTTP fetch completed"
        );

        FetchOutcome::Success(FetchedPage {
            requested_url: url.to_string(),
            final_url,
            status_code,
            headers,
            body,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn failure_from(url: &str, err: &reqwest::Error) -> FetchOutcome {
    let chain = error_chain(err);
    // The outer message embeds the URL, which must not feed the text match.
    let causes = if chain.len() > 1 { &chain[1..] } else { &chain[..] };
    let kind = if err.is_timeout() {
        FailureKind::TimedOut
    } else if err.is_redirect() {
        FailureKind::Unknown
    } else {
        classify_error_text(&causes.join(": "), innermost_io_kind(err))
    };

    warn!(url = %url, kind = %kind, error = %chain.join(": "), "HTTP request failed");

    let detail = if err.is_redirect() {
        "too many redirects".to_string()
    } else {
        chain.last().cloned().unwrap_or_default()
    };

    FetchOutcome::failure(kind, detail)
}

fn error_chain(err: &(dyn StdError + 'static)) -> Vec<String> {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if messages.last() != Some(&message) {
            messages.push(message);
        }
        source = cause.source();
    }
    messages
}

fn innermost_io_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut kind = None;
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            kind = Some(io_err.kind());
        }
        current = e.source();
    }
    kind
}

/// Map transport error text (and the innermost io error kind, if any) to a
/// failure class.
pub(crate) fn classify_error_text(text: &str, io_kind: Option<io::ErrorKind>) -> FailureKind {
    let lower = text.to_lowercase();

    if io_kind == Some(io::ErrorKind::TimedOut) {
        return FailureKind::TimedOut;
    }

    let dns_markers = [
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
        "temporary failure in name resolution",
        "no address associated with hostname",
    ];
    if dns_markers.iter().any(|m| lower.contains(m)) {
        return FailureKind::DnsNotFound;
    }

    if io_kind == Some(io::ErrorKind::ConnectionRefused) || lower.contains("connection refused") {
        return FailureKind::ConnectionRefused;
    }

    let tls_markers = ["certificate", "tls", "ssl", "handshake", "unknownissuer"];
    if tls_markers.iter().any(|m| lower.contains(m)) {
        return FailureKind::SslError;
    }

    if lower.contains("timed out") || lower.contains("timeout") {
        return FailureKind::TimedOut;
    }

    FailureKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dns_failure() {
        let text = "error sending request for url (https://nope.invalid/): client error (Connect): dns error: failed to lookup address information: Name or service not known";
        assert_eq!(classify_error_text(text, None), FailureKind::DnsNotFound);
    }

    #[test]
    fn test_classify_connection_refused() {
        assert_eq!(
            classify_error_text("tcp connect error", Some(io::ErrorKind::ConnectionRefused)),
            FailureKind::ConnectionRefused
        );
        assert_eq!(
            classify_error_text("Connection refused (os error 111)", None),
            FailureKind::ConnectionRefused
        );
    }

    #[test]
    fn test_classify_certificate_errors() {
        assert_eq!(
            classify_error_text("invalid peer certificate: Expired", None),
            FailureKind::SslError
        );
        assert_eq!(
            classify_error_text("received fatal alert: HandshakeFailure", None),
            FailureKind::SslError
        );
    }

    #[test]
    fn test_classify_timeout() {
        assert_eq!(
            classify_error_text("operation timed out", None),
            FailureKind::TimedOut
        );
        assert_eq!(
            classify_error_text("whatever", Some(io::ErrorKind::TimedOut)),
            FailureKind::TimedOut
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(
            classify_error_text("connection reset by peer", None),
            FailureKind::Unknown
        );
    }

    #[derive(Debug)]
    struct SendError(io::Error);

    impl std::fmt::Display for SendError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("error sending request")
        }
    }

    impl StdError for SendError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain_collects_sources() {
        let err = SendError(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        let chain = error_chain(&err);
        assert_eq!(chain, vec!["error sending request", "refused"]);
        assert_eq!(innermost_io_kind(&err), Some(io::ErrorKind::ConnectionRefused));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ScanConfig::new().with_timeout(std::time::Duration::ZERO);
        assert!(HttpFetcher::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_refused_connection_is_classified() {
        // Bind then drop a listener so the port is very likely closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let fetcher = HttpFetcher::new(&ScanConfig::default())
            .unwrap()
            .with_client(client);
        let outcome = fetcher.fetch(&format!("http://127.0.0.1:{}/", port)).await;

        match outcome {
            FetchOutcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::ConnectionRefused),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
