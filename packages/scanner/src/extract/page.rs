//! Parsed page shared by all tiers.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::cell::OnceCell;
use tracing::debug;
use url::Url;

/// A response body parsed once and shared across the tier chain.
///
/// JSON-LD blocks and visible text are computed on first use.
pub struct PageContext<'a> {
    raw: &'a str,
    document: Html,
    base_url: Option<Url>,
    json_ld: OnceCell<Vec<Value>>,
    visible_text: OnceCell<String>,
}

impl<'a> PageContext<'a> {
    /// Parse a page. An unparseable `final_url` just disables relative link
    /// resolution.
    pub fn new(raw: &'a str, final_url: &str) -> Self {
        Self {
            raw,
            document: Html::parse_document(raw),
            base_url: Url::parse(final_url).ok(),
            json_ld: OnceCell::new(),
            visible_text: OnceCell::new(),
        }
    }

    /// Raw markup as received.
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// Parsed document.
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Select elements matching a selector.
    pub fn select<'s>(&'s self, selector: &'s Selector) -> impl Iterator<Item = ElementRef<'s>> + 's {
        self.document.select(selector)
    }

    /// Resolve a possibly relative link against the page URL.
    ///
    /// Protocol-relative links get `https:` when there is no base.
    pub fn absolutize(&self, href: &str) -> String {
        let href = href.trim();
        if let Some(base) = &self.base_url {
            if let Ok(joined) = base.join(href) {
                return joined.to_string();
            }
        }
        match href.strip_prefix("//") {
            Some(rest) => format!("https://{}", rest),
            None => href.to_string(),
        }
    }

    /// Every well-formed JSON-LD block on the page, in document order.
    ///
    /// Malformed blocks are skipped individually.
    pub fn json_ld(&self) -> &[Value] {
        self.json_ld.get_or_init(|| {
            let Ok(selector) = Selector::parse("script[type]") else {
                return Vec::new();
            };

            self.document
                .select(&selector)
                .filter(|el| {
                    el.value()
                        .attr("type")
                        .is_some_and(|t| t.to_ascii_lowercase().contains("ld+json"))
                })
                .filter_map(|el| {
                    let text: String = el.text().collect();
                    match serde_json::from_str::<Value>(text.trim()) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            debug!(error = %e, "Skipping malformed JSON-LD block");
                            None
                        }
                    }
                })
                .collect()
        })
    }

    /// Human-visible text, one text node per line.
    ///
    /// Script, style, noscript and template contents are left out.
    pub fn visible_text(&self) -> &str {
        self.visible_text.get_or_init(|| {
            let mut out = String::new();
            for node in self.document.root_element().descendants() {
                let Some(text) = node.value().as_text() else {
                    continue;
                };
                let hidden = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name().to_string()))
                    .is_some_and(|name| {
                        matches!(name.as_str(), "script" | "style" | "noscript" | "template")
                    });
                if hidden {
                    continue;
                }
                for line in text.lines() {
                    let line = line.trim();
                    if !line.is_empty() {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
            out
        })
    }
}

/// Parse a selector that is known to be valid.
///
/// Used for the fixed selector tables in the tiers.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Value of an element the way microdata defines it: `content`, then link
/// targets, then text.
pub(crate) fn element_value(el: &ElementRef<'_>) -> String {
    let element = el.value();
    if let Some(content) = element.attr("content") {
        return content.to_string();
    }
    if matches!(element.name(), "a" | "link") {
        if let Some(href) = element.attr("href") {
            return href.to_string();
        }
    }
    el.text().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_json_ld_is_skipped() {
        let html = r#"
            <script type="application/ld+json">{ not json </script>
            <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
        "#;
        let page = PageContext::new(html, "https://acme.com");
        assert_eq!(page.json_ld().len(), 1);
        assert_eq!(page.json_ld()[0]["name"], "Acme");
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = r#"<html><body><p>Hello</p><script>var x = "555-123-4567";</script><style>.a{}</style><p>World</p></body></html>"#;
        let page = PageContext::new(html, "");
        assert_eq!(page.visible_text(), "Hello\nWorld\n");
    }

    #[test]
    fn test_absolutize() {
        let page = PageContext::new("", "https://acme.com/about/");
        assert_eq!(page.absolutize("/contact"), "https://acme.com/contact");
        assert_eq!(
            page.absolutize("//facebook.com/acme"),
            "https://facebook.com/acme"
        );

        let no_base = PageContext::new("", "not a url");
        assert_eq!(
            no_base.absolutize("//instagram.com/acme"),
            "https://instagram.com/acme"
        );
    }
}
