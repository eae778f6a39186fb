//! Tier 2: meta tags, `<address>` blocks and typed links.

use lazy_static::lazy_static;
use scraper::Selector;

use super::address::parse_address_lines;
use super::page::{selector, PageContext};
use super::validate::strip_prefix_ignore_case;
use super::{Field, FieldResolver, Tier};

lazy_static! {
    static ref SITE_NAME_META: Selector = selector(
        "meta[property=\"og:site_name\"], meta[name=\"og:site_name\"], meta[name=\"application-name\"]"
    );
    static ref ADDRESS: Selector = selector("address");
    static ref ANCHOR: Selector = selector("a[href]");
    static ref IFRAME: Selector = selector("iframe[src]");
}

/// Markup whose meaning is implied by the element or attribute used.
pub struct SemanticMarkup;

impl FieldResolver for SemanticMarkup {
    fn tier(&self) -> Tier {
        Tier::Semantic
    }

    fn candidates(&self, page: &PageContext<'_>, field: Field) -> Vec<String> {
        match field {
            Field::Name => page
                .select(&SITE_NAME_META)
                .filter_map(|el| el.value().attr("content"))
                .map(str::to_string)
                .collect(),
            Field::Street | Field::City | Field::State | Field::Zip => address_candidates(page, field),
            Field::Phone => typed_links(page, "tel:"),
            Field::Email => typed_links(page, "mailto:"),
            Field::Facebook | Field::Instagram | Field::Linkedin => links(page),
            Field::Gmb => {
                let mut out = links(page);
                out.extend(
                    page.select(&IFRAME)
                        .filter_map(|el| el.value().attr("src"))
                        .map(|src| page.absolutize(src)),
                );
                out
            }
        }
    }
}

fn address_candidates(page: &PageContext<'_>, field: Field) -> Vec<String> {
    page.select(&ADDRESS)
        .filter_map(|el| {
            let lines: Vec<String> = el
                .text()
                .flat_map(str::lines)
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            let parts = parse_address_lines(&lines);
            match field {
                Field::Street => parts.street,
                Field::City => parts.city,
                Field::State => parts.state,
                Field::Zip => parts.zip,
                _ => None,
            }
        })
        .collect()
}

/// `href` values of anchors using the given scheme, scheme included.
fn typed_links(page: &PageContext<'_>, scheme: &str) -> Vec<String> {
    page.select(&ANCHOR)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| strip_prefix_ignore_case(href, scheme).len() < href.len())
        .map(str::to_string)
        .collect()
}

fn links(page: &PageContext<'_>) -> Vec<String> {
    page.select(&ANCHOR)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| page.absolutize(href))
        .collect()
}
