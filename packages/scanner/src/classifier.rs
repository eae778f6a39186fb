//! Liveness classification of a fetch outcome.
//!
//! A failed fetch is always `Inactive` with the transport reason. A response
//! is judged by an ordered rule list: every rule is checked, and the last one
//! that applies decides the reason. Only the status-code and parked-domain
//! rules change the status.

use url::Url;

use crate::types::outcome::{FetchOutcome, FetchedPage};
use crate::types::result::SiteStatus;

/// Status verdict for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: SiteStatus,
    pub status_code: u16,
    pub reason: String,
}

/// What a matching rule contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub reason: String,
    pub force_inactive: bool,
}

impl Verdict {
    fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            force_inactive: false,
        }
    }

    fn inactive(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            force_inactive: true,
        }
    }
}

/// Inputs available to each rule.
pub struct RuleInput<'a> {
    pub page: &'a FetchedPage,
    /// Lower-cased body, present only when the body is under the ceiling
    pub lowered_body: Option<String>,
}

/// A single classification rule.
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&RuleInput<'_>) -> Option<Verdict>,
}

/// Rules in evaluation order. Later matches override earlier ones.
pub const RULES: &[Rule] = &[
    Rule {
        name: "redirected",
        check: redirected_off_site,
    },
    Rule {
        name: "http_status",
        check: http_status,
    },
    Rule {
        name: "construction",
        check: construction_placeholder,
    },
    Rule {
        name: "parked",
        check: parked_domain,
    },
    Rule {
        name: "blank",
        check: blank_body,
    },
];

const PARKED_PHRASES: &[&str] = &[
    "parked domain",
    "domain is parked",
    "this domain is for sale",
    "this domain may be for sale",
    "domain may be for sale",
    "buy this domain",
];

fn redirected_off_site(input: &RuleInput<'_>) -> Option<Verdict> {
    let requested = site_host(&input.page.requested_url)?;
    let landed = site_host(&input.page.final_url)?;
    (requested != landed).then(|| Verdict::reason("Redirected"))
}

fn http_status(input: &RuleInput<'_>) -> Option<Verdict> {
    (!input.page.is_ok_status())
        .then(|| Verdict::inactive(format!("HTTP {}", input.page.status_code)))
}

fn construction_placeholder(input: &RuleInput<'_>) -> Option<Verdict> {
    let body = input.lowered_body.as_deref()?;
    if body.contains("under construction") {
        Some(Verdict::reason("Under Construction"))
    } else if body.contains("coming soon") {
        Some(Verdict::reason("Coming Soon"))
    } else {
        None
    }
}

fn parked_domain(input: &RuleInput<'_>) -> Option<Verdict> {
    let body = input.lowered_body.as_deref()?;
    PARKED_PHRASES
        .iter()
        .any(|phrase| body.contains(phrase))
        .then(|| Verdict::inactive("Parked Domain"))
}

fn blank_body(input: &RuleInput<'_>) -> Option<Verdict> {
    (!input.page.has_content()).then(|| Verdict::reason("Blank / No Content"))
}

/// Host without a leading `www.`, lower-cased.
fn site_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Classify a fetch outcome.
///
/// `body_limit` is the character ceiling above which body-text heuristics
/// are skipped.
pub fn classify(outcome: &FetchOutcome, body_limit: usize) -> Classification {
    match outcome {
        FetchOutcome::Failure { kind, detail } => Classification {
            status: SiteStatus::Inactive,
            status_code: 0,
            reason: kind.reason(detail),
        },
        FetchOutcome::Success(page) => classify_page(page, body_limit),
    }
}

/// Classify a received page.
pub fn classify_page(page: &FetchedPage, body_limit: usize) -> Classification {
    let lowered_body =
        (page.body.chars().count() < body_limit).then(|| page.body.to_lowercase());
    let input = RuleInput { page, lowered_body };

    let mut status = if page.is_ok_status() {
        SiteStatus::Active
    } else {
        SiteStatus::Inactive
    };
    let mut reason = String::new();

    for rule in RULES {
        if let Some(verdict) = (rule.check)(&input) {
            tracing::trace!(rule = rule.name, reason = %verdict.reason, "Classification rule matched");
            reason = verdict.reason;
            if verdict.force_inactive {
                status = SiteStatus::Inactive;
            }
        }
    }

    Classification {
        status,
        status_code: page.status_code,
        reason,
    }
}
