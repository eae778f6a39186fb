//! Business profile extraction.
//!
//! Every profile and social field is resolved on its own by walking a fixed
//! chain of tiers, most trusted first:
//!
//! 1. [`StructuredData`] - JSON-LD organizations and schema.org microdata
//! 2. [`SemanticMarkup`] - meta tags, `<address>`, `tel:`/`mailto:` and
//!    social anchors
//! 3. [`FallbackMarkup`] - `<title>`
//! 4. [`RawPatterns`] - regexes over the raw markup and visible text
//!
//! Each tier offers candidate values; the first candidate that survives
//! normalization and validation wins and the remaining tiers are skipped
//! for that field. Nothing in here fails: a tier that cannot parse its
//! input simply offers no candidates.

mod address;
mod fallback;
mod page;
mod patterns;
mod semantic;
mod structured;
mod validate;

pub use address::{parse_address_lines, AddressParts};
pub use fallback::FallbackMarkup;
pub use page::PageContext;
pub use patterns::RawPatterns;
pub use semantic::SemanticMarkup;
pub use structured::StructuredData;
pub use validate::{accept, clean_text, is_excluded_email, SocialPlatform};

use tracing::trace;

use crate::types::result::{BusinessProfile, SocialProfile};

/// A field of the extracted profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Street,
    City,
    State,
    Zip,
    Phone,
    Email,
    Facebook,
    Instagram,
    Linkedin,
    Gmb,
}

impl Field {
    /// All fields, in resolution order.
    pub const ALL: [Field; 11] = [
        Field::Name,
        Field::Street,
        Field::City,
        Field::State,
        Field::Zip,
        Field::Phone,
        Field::Email,
        Field::Facebook,
        Field::Instagram,
        Field::Linkedin,
        Field::Gmb,
    ];

    /// Social platform for link fields.
    pub fn platform(&self) -> Option<SocialPlatform> {
        match self {
            Field::Facebook => Some(SocialPlatform::Facebook),
            Field::Instagram => Some(SocialPlatform::Instagram),
            Field::Linkedin => Some(SocialPlatform::Linkedin),
            Field::Gmb => Some(SocialPlatform::Gmb),
            _ => None,
        }
    }
}

/// Extraction tiers, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Structured,
    Semantic,
    Fallback,
    Pattern,
}

/// One strategy for finding field values on a page.
///
/// Implementations return candidates in their own preference order and may
/// return garbage; the engine normalizes and validates every candidate.
pub trait FieldResolver: Send + Sync {
    /// The tier this resolver belongs to.
    fn tier(&self) -> Tier;

    /// Candidate values for a field. Empty when the tier has nothing.
    fn candidates(&self, page: &PageContext<'_>, field: Field) -> Vec<String>;
}

/// Profile and social links extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedProfile {
    pub profile: BusinessProfile,
    pub social: SocialProfile,
}

/// Runs the tier chain over a page.
pub struct ExtractionEngine {
    tiers: Vec<Box<dyn FieldResolver>>,
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionEngine {
    /// Create an engine with the standard four-tier chain.
    pub fn new() -> Self {
        Self::with_tiers(vec![
            Box::new(StructuredData),
            Box::new(SemanticMarkup),
            Box::new(FallbackMarkup),
            Box::new(RawPatterns),
        ])
    }

    /// Create an engine with a custom chain. Tiers are sorted by precedence.
    pub fn with_tiers(mut tiers: Vec<Box<dyn FieldResolver>>) -> Self {
        tiers.sort_by_key(|t| t.tier());
        Self { tiers }
    }

    /// Extract a profile from a response body.
    ///
    /// `final_url` is used to resolve relative links; it may be empty.
    pub fn extract(&self, body: &str, final_url: &str) -> ExtractedProfile {
        let page = PageContext::new(body, final_url);
        let mut out = ExtractedProfile::default();

        for field in Field::ALL {
            let Some(value) = self.resolve(&page, field) else {
                continue;
            };
            let slot = match field {
                Field::Name => &mut out.profile.name,
                Field::Street => &mut out.profile.street,
                Field::City => &mut out.profile.city,
                Field::State => &mut out.profile.state,
                Field::Zip => &mut out.profile.zip,
                Field::Phone => &mut out.profile.phone,
                Field::Email => &mut out.profile.email,
                Field::Facebook => &mut out.social.facebook,
                Field::Instagram => &mut out.social.instagram,
                Field::Linkedin => &mut out.social.linkedin,
                Field::Gmb => &mut out.social.gmb,
            };
            *slot = value;
        }

        out
    }

    /// Resolve a single field through the chain.
    pub fn resolve(&self, page: &PageContext<'_>, field: Field) -> Option<String> {
        for tier in &self.tiers {
            for candidate in tier.candidates(page, field) {
                if let Some(value) = accept(field, &candidate) {
                    trace!(field = ?field, tier = ?tier.tier(), value = %value, "Field resolved");
                    return Some(match field {
                        Field::Name => strip_name_tagline(&value),
                        _ => value,
                    });
                }
            }
        }
        None
    }
}

/// Cut a trailing site tagline off a business name.
///
/// "Acme Co | Home" becomes "Acme Co". The cut happens at the first `|`,
/// en dash, em dash or hyphen with whitespace on at least one side
/// ("Coca-Cola" stays whole), and only when the leading part is longer than
/// two characters.
pub fn strip_name_tagline(name: &str) -> String {
    if let Some(idx) = tagline_separator(name) {
        let head = name[..idx].trim();
        if head.chars().count() > 2 {
            return head.to_string();
        }
    }

    name.trim().to_string()
}

fn tagline_separator(name: &str) -> Option<usize> {
    let mut prev: Option<char> = None;
    let mut chars = name.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        let is_separator = match c {
            '|' | '\u{2013}' | '\u{2014}' => true,
            '-' => prev.is_some_and(char::is_whitespace) || next.is_some_and(char::is_whitespace),
            _ => false,
        };
        if is_separator {
            return Some(idx);
        }
        prev = Some(c);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_name_tagline() {
        assert_eq!(strip_name_tagline("Acme Co | Home"), "Acme Co");
        assert_eq!(strip_name_tagline("Acme Co \u{2013} Plumbing"), "Acme Co");
        assert_eq!(strip_name_tagline("Acme Co \u{2014} Since 1990"), "Acme Co");
        assert_eq!(strip_name_tagline("Acme Co - Welcome"), "Acme Co");
        assert_eq!(strip_name_tagline("Acme | Roofing - Denver"), "Acme");
        assert_eq!(strip_name_tagline("Acme Plumbing- Home"), "Acme Plumbing");
        assert_eq!(strip_name_tagline("Acme Plumbing -Home"), "Acme Plumbing");
    }

    #[test]
    fn test_strip_name_keeps_short_heads() {
        assert_eq!(strip_name_tagline("AB | Consulting"), "AB | Consulting");
    }

    #[test]
    fn test_strip_name_keeps_inner_hyphens() {
        assert_eq!(strip_name_tagline("Coca-Cola Bottling"), "Coca-Cola Bottling");
        assert_eq!(
            strip_name_tagline("Coca-Cola Bottling - Since 1902"),
            "Coca-Cola Bottling"
        );
    }

    #[test]
    fn test_empty_page_yields_empty_profile() {
        let engine = ExtractionEngine::new();
        let out = engine.extract("", "");
        assert_eq!(out, ExtractedProfile::default());
    }

    #[test]
    fn test_custom_chain_is_sorted_by_precedence() {
        let engine = ExtractionEngine::with_tiers(vec![
            Box::new(RawPatterns),
            Box::new(FallbackMarkup),
        ]);
        let html = "<html><head><title>Acme Bakery</title></head><body>Call 555-123-4567</body></html>";
        let page = PageContext::new(html, "https://acme.com");
        assert_eq!(
            engine.resolve(&page, Field::Name),
            Some("Acme Bakery".to_string())
        );
    }
}
