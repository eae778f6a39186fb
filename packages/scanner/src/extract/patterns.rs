//! Tier 4: regular expressions over raw markup and visible text.
//!
//! Catches values that only exist in inline scripts or client-rendered
//! markup, where the selector based tiers find nothing.

use lazy_static::lazy_static;
use regex::Regex;

use super::page::PageContext;
use super::{Field, FieldResolver, Tier};

const PHONE: &str = r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\d{3})[-.\s]?\d{3}[-.\s]?\d{4}";
const URL_TAIL: &str = r#"[^\s"'<>)\\]"#;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
    static ref PHONE_NEAR_KEYWORD: Regex =
        Regex::new(&format!(r"(?is)(?:phone|tel|call|contact).{{0,40}}?(?P<number>{PHONE})")).unwrap();
    static ref PHONE_BARE: Regex = Regex::new(PHONE).unwrap();
    static ref FACEBOOK_URL: Regex =
        Regex::new(&format!(r"(?i)https?://(?:[a-z0-9-]+\.)?facebook\.com/{URL_TAIL}+")).unwrap();
    static ref INSTAGRAM_URL: Regex =
        Regex::new(&format!(r"(?i)https?://(?:[a-z0-9-]+\.)?instagram\.com/{URL_TAIL}+")).unwrap();
    static ref LINKEDIN_URL: Regex =
        Regex::new(&format!(r"(?i)https?://(?:[a-z0-9-]+\.)?linkedin\.com/{URL_TAIL}+")).unwrap();
    static ref GMB_URL: Regex = Regex::new(&format!(
        r"(?i)https?://(?:(?:www\.)?google\.[a-z.]+/maps{URL_TAIL}*|maps\.google\.[a-z.]+/{URL_TAIL}*|maps\.app\.goo\.gl/{URL_TAIL}+|goo\.gl/maps/{URL_TAIL}+|g\.page/{URL_TAIL}+)"
    ))
    .unwrap();
    static ref ONE_LINE_ADDRESS: Regex = Regex::new(
        r"(?P<street>\d{1,5} [\w .#]+?),\s*(?P<city>[A-Za-z][A-Za-z .]*?),\s*(?P<state>[A-Z]{2})\s+(?P<zip>\d{5}(?:-\d{4})?)\b"
    )
    .unwrap();
}

/// Last-resort pattern matching.
pub struct RawPatterns;

impl FieldResolver for RawPatterns {
    fn tier(&self) -> Tier {
        Tier::Pattern
    }

    fn candidates(&self, page: &PageContext<'_>, field: Field) -> Vec<String> {
        match field {
            Field::Name => Vec::new(),
            Field::Email => EMAIL
                .find_iter(page.raw())
                .map(|m| m.as_str().to_string())
                .collect(),
            Field::Phone => phone_candidates(page),
            Field::Street | Field::City | Field::State | Field::Zip => {
                let group = match field {
                    Field::Street => "street",
                    Field::City => "city",
                    Field::State => "state",
                    _ => "zip",
                };
                page.visible_text()
                    .lines()
                    .flat_map(|line| ONE_LINE_ADDRESS.captures_iter(line))
                    .filter_map(|caps| caps.name(group).map(|m| m.as_str().to_string()))
                    .collect()
            }
            Field::Facebook => social_candidates(page, &FACEBOOK_URL),
            Field::Instagram => social_candidates(page, &INSTAGRAM_URL),
            Field::Linkedin => social_candidates(page, &LINKEDIN_URL),
            Field::Gmb => social_candidates(page, &GMB_URL),
        }
    }
}

/// Numbers near a contact keyword in the markup first, then any
/// phone-shaped digit group in the visible text.
fn phone_candidates(page: &PageContext<'_>) -> Vec<String> {
    let mut out: Vec<String> = PHONE_NEAR_KEYWORD
        .captures_iter(page.raw())
        .filter_map(|caps| caps.name("number"))
        .filter(|m| standalone(page.raw(), m.start(), m.end()))
        .map(|m| m.as_str().to_string())
        .collect();

    let text = page.visible_text();
    out.extend(
        PHONE_BARE
            .find_iter(text)
            .filter(|m| standalone(text, m.start(), m.end()))
            .map(|m| m.as_str().to_string()),
    );
    out
}

/// The match is not a slice of a longer digit run (order ids, timestamps).
fn standalone(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
}

fn social_candidates(page: &PageContext<'_>, pattern: &Regex) -> Vec<String> {
    // Inline JSON often escapes slashes.
    let raw = page.raw().replace("\\/", "/");
    pattern
        .find_iter(&raw)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';']).to_string())
        .collect()
}
