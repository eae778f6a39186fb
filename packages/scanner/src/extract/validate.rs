//! Candidate normalization and validation, shared by every tier.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::Field;

lazy_static! {
    static ref EMAIL_SHAPE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    static ref ZIP_SHAPE: Regex = Regex::new(r"^\d{5}(?:-\d{4})?$").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Substrings that mark an address as tooling noise or a placeholder.
const EXCLUDED_EMAIL_MARKERS: &[&str] = &["example", "sentry", "webpack", "wixpress", "yourdomain"];

/// Asset file names that look like emails (`logo@2x.png`).
const ASSET_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".avif", ".ico", ".bmp", ".tiff", ".css",
    ".js", ".mp4", ".webm", ".woff", ".woff2", ".ttf", ".otf", ".pdf",
];

/// Collapse internal whitespace and trim.
pub fn clean_text(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Check whether an email belongs to the exclusion list.
pub fn is_excluded_email(email: &str) -> bool {
    let lower = email.to_ascii_lowercase();
    EXCLUDED_EMAIL_MARKERS.iter().any(|m| lower.contains(m))
        || ASSET_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Social link targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Linkedin,
    /// Google Business Profile / Google Maps listing
    Gmb,
}

impl SocialPlatform {
    /// Check whether a URL is this platform's profile link.
    ///
    /// Share buttons, dialogs, tracking pixels and bare platform home pages
    /// are rejected; they say nothing about the business.
    pub fn accepts(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let path = parsed.path().to_ascii_lowercase();
        let first_segment = path.trim_matches('/').split('/').next().unwrap_or("");

        match self {
            SocialPlatform::Facebook => {
                // Numeric segments are namespace URIs like `/2008/fbml`.
                host_is(&host, "facebook.com")
                    && !first_segment.is_empty()
                    && !first_segment.chars().all(|c| c.is_ascii_digit())
                    && !FACEBOOK_NON_PROFILE.contains(&first_segment)
            }
            SocialPlatform::Instagram => {
                host_is(&host, "instagram.com")
                    && !first_segment.is_empty()
                    && !INSTAGRAM_NON_PROFILE.contains(&first_segment)
            }
            SocialPlatform::Linkedin => {
                host_is(&host, "linkedin.com")
                    && !first_segment.is_empty()
                    && !LINKEDIN_NON_PROFILE.contains(&first_segment)
            }
            SocialPlatform::Gmb => {
                (host_is(&host, "google.com") && path.starts_with("/maps"))
                    || host.starts_with("maps.google.")
                    || (host.starts_with("www.google.") && path.starts_with("/maps"))
                    || (host == "goo.gl" && path.starts_with("/maps"))
                    || host == "maps.app.goo.gl"
                    || host == "g.page"
            }
        }
    }
}

/// First path segments that are share widgets, dialogs or site pages rather
/// than a profile.
const FACEBOOK_NON_PROFILE: &[&str] = &[
    "sharer", "sharer.php", "share", "share.php", "dialog", "plugins", "tr", "login", "login.php",
    "policies", "privacy",
];
const INSTAGRAM_NON_PROFILE: &[&str] = &["share", "explore", "accounts"];
const LINKEDIN_NON_PROFILE: &[&str] = &["sharearticle", "sharing", "share", "cws"];

fn host_is(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Normalize a candidate for a field and validate it.
///
/// Returns the cleaned value when it is acceptable.
pub fn accept(field: Field, candidate: &str) -> Option<String> {
    if let Some(platform) = field.platform() {
        let url = normalize_link(candidate);
        return platform.accepts(&url).then_some(url);
    }

    match field {
        Field::Email => {
            let email = normalize_email(candidate);
            (EMAIL_SHAPE.is_match(&email) && !is_excluded_email(&email)).then_some(email)
        }
        Field::Phone => {
            let phone = normalize_phone(candidate);
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            (7..=15).contains(&digits).then_some(phone)
        }
        Field::Zip => {
            let zip = clean_text(candidate);
            ZIP_SHAPE.is_match(&zip).then_some(zip)
        }
        Field::State => {
            let state = clean_text(candidate).trim_end_matches(['.', ',']).to_string();
            let valid = !state.is_empty()
                && state.chars().count() <= 40
                && state.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '.');
            valid.then(|| {
                if state.len() == 2 {
                    state.to_ascii_uppercase()
                } else {
                    state
                }
            })
        }
        Field::City => {
            let city = clean_text(candidate).trim_end_matches(',').to_string();
            let valid = !city.is_empty()
                && city.chars().count() <= 80
                && city.chars().any(char::is_alphabetic);
            valid.then_some(city)
        }
        Field::Street => {
            let street = clean_text(candidate).trim_end_matches(',').to_string();
            let valid = !street.is_empty() && street.chars().count() <= 160;
            valid.then_some(street)
        }
        Field::Name => {
            let name = clean_text(candidate);
            let valid = name.chars().any(char::is_alphanumeric) && name.chars().count() <= 200;
            valid.then_some(name)
        }
        Field::Facebook | Field::Instagram | Field::Linkedin | Field::Gmb => None,
    }
}

pub(crate) fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> &'a str {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &s[prefix.len()..],
        _ => s,
    }
}

fn normalize_link(candidate: &str) -> String {
    let link = candidate.trim().replace("&amp;", "&");
    match link.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => link,
    }
}

fn normalize_email(candidate: &str) -> String {
    let trimmed = candidate.trim();
    let without_scheme = strip_prefix_ignore_case(trimmed, "mailto:");
    without_scheme
        .split('?')
        .next()
        .unwrap_or("")
        .replace("%40", "@")
        .trim()
        .to_string()
}

fn normalize_phone(candidate: &str) -> String {
    let trimmed = candidate.trim();
    let without_scheme = strip_prefix_ignore_case(trimmed, "tel:");
    clean_text(
        &without_scheme
            .replace("%20", " ")
            .replace("%2B", "+")
            .replace("%2b", "+"),
    )
}
