//! Tier 3: the document title.

use lazy_static::lazy_static;
use scraper::Selector;

use super::page::{selector, PageContext};
use super::{Field, FieldResolver, Tier};

lazy_static! {
    static ref TITLE: Selector = selector("title");
}

/// Generic markup that usually, but not reliably, names the business.
pub struct FallbackMarkup;

impl FieldResolver for FallbackMarkup {
    fn tier(&self) -> Tier {
        Tier::Fallback
    }

    fn candidates(&self, page: &PageContext<'_>, field: Field) -> Vec<String> {
        match field {
            Field::Name => page
                .select(&TITLE)
                .map(|el| el.text().collect::<String>())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_name_candidate() {
        let page = PageContext::new(
            "<html><head><title>  Acme Bakery | Fresh Bread </title></head></html>",
            "",
        );
        assert_eq!(
            FallbackMarkup.candidates(&page, Field::Name),
            vec!["  Acme Bakery | Fresh Bread "]
        );
        assert!(FallbackMarkup.candidates(&page, Field::Phone).is_empty());
    }
}
