//! Domain normalization and candidate URL generation.

/// A normalized domain with the URLs to try for it, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDomain {
    /// Canonical bare domain, lower-cased
    pub domain: String,
    /// Candidate absolute URLs in fetch order
    pub candidates: Vec<String>,
}

/// Normalize a raw domain string to its canonical bare form.
///
/// Strips whitespace, a leading `http://`/`https://`, and anything after the
/// host (path, query, fragment, trailing slashes). Returns `None` when
/// nothing is left.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_scheme = strip_scheme(trimmed);

    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .trim()
        .trim_end_matches('.')
        .to_ascii_lowercase();

    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return None;
    }

    Some(host)
}

fn strip_scheme(s: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if let Some(head) = s.get(..scheme.len()) {
            if head.eq_ignore_ascii_case(scheme) {
                return &s[scheme.len()..];
            }
        }
    }
    s
}

/// Resolve a raw domain into its canonical form and candidate URLs.
///
/// Candidate order is `https://d`, `http://d`, `https://www.d`,
/// `http://www.d`. Domains that already start with `www.` only get the two
/// scheme variants.
pub fn resolve(raw: &str) -> Option<ResolvedDomain> {
    let domain = normalize_domain(raw)?;

    let mut candidates = vec![format!("https://{}", domain), format!("http://{}", domain)];
    if !domain.starts_with("www.") {
        candidates.push(format!("https://www.{}", domain));
        candidates.push(format!("http://www.{}", domain));
    }

    Some(ResolvedDomain { domain, candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_strips_scheme_and_slashes() {
        assert_eq!(normalize_domain("https://acme.com/"), Some("acme.com".into()));
        assert_eq!(normalize_domain("http://acme.com//"), Some("acme.com".into()));
        assert_eq!(normalize_domain("  acme.com \n"), Some("acme.com".into()));
        assert_eq!(normalize_domain("HTTPS://Acme.COM"), Some("acme.com".into()));
    }

    #[test]
    fn test_normalize_drops_path_and_query() {
        assert_eq!(
            normalize_domain("acme.com/contact?x=1#top"),
            Some("acme.com".into())
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(normalize_domain(""), None);
        assert_eq!(normalize_domain("   "), None);
        assert_eq!(normalize_domain("https://"), None);
        assert_eq!(normalize_domain("http:///"), None);
    }

    #[test]
    fn test_candidate_order() {
        let resolved = resolve("acme.com").unwrap();
        assert_eq!(
            resolved.candidates,
            vec![
                "https://acme.com",
                "http://acme.com",
                "https://www.acme.com",
                "http://www.acme.com",
            ]
        );
    }

    #[test]
    fn test_www_input_is_not_doubled() {
        let resolved = resolve("www.acme.com").unwrap();
        assert_eq!(resolved.domain, "www.acme.com");
        assert_eq!(
            resolved.candidates,
            vec!["https://www.acme.com", "http://www.acme.com"]
        );
    }

    proptest! {
        #[test]
        fn prop_decorations_do_not_change_canonical_form(
            host in "[a-z][a-z0-9-]{0,12}\\.(com|org|net)",
            scheme in prop::sample::select(vec!["", "http://", "https://", "HTTPS://"]),
            slashes in "/{0,3}",
            pad in " {0,2}",
        ) {
            let raw = format!("{pad}{scheme}{host}{slashes}{pad}");
            prop_assert_eq!(normalize_domain(&raw), Some(host.clone()));
            let resolved = resolve(&raw).unwrap();
            prop_assert_eq!(&resolved.candidates[0], &format!("https://{}", host));
        }
    }
}
