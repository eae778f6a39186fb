//! Tier 1: JSON-LD organizations and schema.org microdata.

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use serde_json::Value;

use super::address::parse_address_lines;
use super::page::{element_value, selector, PageContext};
use super::{Field, FieldResolver, Tier};

lazy_static! {
    static ref MICRODATA_NAME: Selector = selector("[itemprop=\"name\"]");
    static ref MICRODATA_STREET: Selector = selector("[itemprop=\"streetAddress\"]");
    static ref MICRODATA_CITY: Selector = selector("[itemprop=\"addressLocality\"]");
    static ref MICRODATA_STATE: Selector = selector("[itemprop=\"addressRegion\"]");
    static ref MICRODATA_ZIP: Selector = selector("[itemprop=\"postalCode\"]");
    static ref MICRODATA_PHONE: Selector = selector("[itemprop=\"telephone\"]");
    static ref MICRODATA_EMAIL: Selector = selector("[itemprop=\"email\"]");
    static ref MICRODATA_SAME_AS: Selector = selector("[itemprop=\"sameAs\"], [itemprop=\"hasMap\"]");
}

/// schema.org types treated as "the business".
const ORGANIZATION_TYPES: &[&str] = &[
    "Organization",
    "LocalBusiness",
    "Corporation",
    "NGO",
    "EducationalOrganization",
    "MedicalOrganization",
    "ProfessionalService",
    "Store",
    "Restaurant",
    "FoodEstablishment",
    "LegalService",
    "FinancialService",
    "RealEstateAgent",
    "Dentist",
    "Physician",
    "Attorney",
    "Plumber",
    "Electrician",
    "HVACBusiness",
    "RoofingContractor",
    "GeneralContractor",
    "AutoRepair",
];

/// JSON-LD nesting deeper than this is not searched.
const MAX_JSON_LD_DEPTH: usize = 8;

/// JSON-LD `Organization` objects first, then microdata attributes.
pub struct StructuredData;

impl FieldResolver for StructuredData {
    fn tier(&self) -> Tier {
        Tier::Structured
    }

    fn candidates(&self, page: &PageContext<'_>, field: Field) -> Vec<String> {
        let mut out = Vec::new();

        let mut orgs = Vec::new();
        for block in page.json_ld() {
            collect_organizations(block, 0, &mut orgs);
        }
        for org in &orgs {
            org_candidates(org, field, &mut out);
        }

        let microdata: &Selector = match field {
            Field::Name => &*MICRODATA_NAME,
            Field::Street => &*MICRODATA_STREET,
            Field::City => &*MICRODATA_CITY,
            Field::State => &*MICRODATA_STATE,
            Field::Zip => &*MICRODATA_ZIP,
            Field::Phone => &*MICRODATA_PHONE,
            Field::Email => &*MICRODATA_EMAIL,
            Field::Facebook | Field::Instagram | Field::Linkedin | Field::Gmb => &*MICRODATA_SAME_AS,
        };
        out.extend(
            page.select(microdata)
                .filter(|el| field != Field::Name || names_organization(el))
                .map(|el| element_value(&el)),
        );

        out
    }
}

fn is_organization_type(t: &str) -> bool {
    let short = t.trim().trim_end_matches('/').rsplit('/').next().unwrap_or(t);
    ORGANIZATION_TYPES.contains(&short) || short.ends_with("Business")
}

fn is_organization(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => is_organization_type(t),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(is_organization_type),
        _ => false,
    }
}

/// A microdata `name` belongs to the organization only when its nearest
/// enclosing item scope is the organization itself, not a nested founder,
/// employee or product.
fn names_organization(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|scope| scope.value().attr("itemscope").is_some())
        .and_then(|scope| scope.value().attr("itemtype"))
        .is_some_and(|types| types.split_whitespace().any(is_organization_type))
}

/// Walk a JSON-LD value depth-first, collecting organization objects in
/// document order.
fn collect_organizations<'v>(value: &'v Value, depth: usize, out: &mut Vec<&'v Value>) {
    if depth > MAX_JSON_LD_DEPTH {
        return;
    }
    match value {
        Value::Array(items) => {
            for item in items {
                collect_organizations(item, depth + 1, out);
            }
        }
        Value::Object(map) => {
            if is_organization(value) {
                out.push(value);
            }
            for child in map.values() {
                if child.is_object() || child.is_array() {
                    collect_organizations(child, depth + 1, out);
                }
            }
        }
        _ => {}
    }
}

/// Strings held by a JSON-LD property that may be a scalar or an array.
fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(Value::Array(items)) => items.iter().flat_map(|v| strings(Some(v))).collect(),
        Some(Value::Object(map)) => map
            .get("url")
            .or_else(|| map.get("@id"))
            .and_then(Value::as_str)
            .map(|s| vec![s.to_string()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn org_candidates(org: &Value, field: Field, out: &mut Vec<String>) {
    match field {
        Field::Name => {
            out.extend(strings(org.get("name")));
            out.extend(strings(org.get("legalName")));
        }
        Field::Phone => out.extend(strings(org.get("telephone"))),
        Field::Email => out.extend(strings(org.get("email"))),
        Field::Street | Field::City | Field::State | Field::Zip => {
            for address in addresses(org) {
                out.extend(address_part(address, field));
            }
        }
        Field::Facebook | Field::Instagram | Field::Linkedin => {
            out.extend(strings(org.get("sameAs")));
        }
        Field::Gmb => {
            out.extend(strings(org.get("hasMap")));
            out.extend(strings(org.get("sameAs")));
        }
    }
}

/// Address values of an organization, including `location.address`.
fn addresses(org: &Value) -> Vec<&Value> {
    let mut found = Vec::new();
    push_addresses(&mut found, org.get("address"));
    match org.get("location") {
        Some(Value::Array(places)) => {
            for place in places {
                push_addresses(&mut found, place.get("address"));
            }
        }
        Some(place) => push_addresses(&mut found, place.get("address")),
        None => {}
    }
    found
}

fn push_addresses<'v>(found: &mut Vec<&'v Value>, value: Option<&'v Value>) {
    match value {
        Some(Value::Array(items)) => found.extend(items.iter()),
        Some(v) => found.push(v),
        None => {}
    }
}

fn address_part(address: &Value, field: Field) -> Vec<String> {
    match address {
        Value::Object(_) => {
            let key = match field {
                Field::Street => "streetAddress",
                Field::City => "addressLocality",
                Field::State => "addressRegion",
                Field::Zip => "postalCode",
                _ => return Vec::new(),
            };
            let values = strings(address.get(key));
            if field == Field::Street && values.len() > 1 {
                vec![values.join(", ")]
            } else {
                values
            }
        }
        Value::String(text) => {
            let parts = parse_address_lines(&[text.clone()]);
            let part = match field {
                Field::Street => parts.street,
                Field::City => parts.city,
                Field::State => parts.state,
                Field::Zip => parts.zip,
                _ => None,
            };
            part.into_iter().collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(html: &str, field: Field) -> Vec<String> {
        let page = PageContext::new(html, "https://acme.com");
        StructuredData.candidates(&page, field)
    }

    const ORG: &str = r#"
        <script type="application/ld+json">
        {
          "@context": "https://schema.org",
          "@type": "Organization",
          "name": "Acme Robotics",
          "telephone": "+1-415-555-0100",
          "email": "hello@acmerobotics.com",
          "address": {
            "@type": "PostalAddress",
            "streetAddress": "500 Howard St",
            "addressLocality": "San Francisco",
            "addressRegion": "CA",
            "postalCode": "94105"
          },
          "sameAs": [
            "https://www.facebook.com/acmerobotics",
            "https://www.linkedin.com/company/acme-robotics"
          ]
        }
        </script>
    "#;

    #[test]
    fn test_json_ld_organization_fields() {
        assert_eq!(candidates(ORG, Field::Name), vec!["Acme Robotics"]);
        assert_eq!(candidates(ORG, Field::Zip), vec!["94105"]);
        assert_eq!(candidates(ORG, Field::City), vec!["San Francisco"]);
        assert_eq!(candidates(ORG, Field::Phone), vec!["+1-415-555-0100"]);
        assert!(candidates(ORG, Field::Linkedin)
            .contains(&"https://www.linkedin.com/company/acme-robotics".to_string()));
    }

    #[test]
    fn test_graph_container_and_numeric_zip() {
        let html = r#"<script type="application/ld+json">
            {"@graph": [
              {"@type": "WebSite", "name": "Not the business"},
              {"@type": ["LocalBusiness", "Bakery"], "name": "Rise Bakery",
               "address": {"postalCode": 62701}}
            ]}
        </script>"#;
        assert_eq!(candidates(html, Field::Name), vec!["Rise Bakery"]);
        assert_eq!(candidates(html, Field::Zip), vec!["62701"]);
    }

    #[test]
    fn test_string_address() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Dentist", "address": "12 Elm St, Boulder, CO 80302"}
        </script>"#;
        assert_eq!(candidates(html, Field::Street), vec!["12 Elm St"]);
        assert_eq!(candidates(html, Field::State), vec!["CO"]);
    }

    #[test]
    fn test_malformed_block_does_not_hide_valid_one() {
        let html = r#"
            <script type="application/ld+json">{"@type": "Organization", "name": </script>
            <script type="application/ld+json">{"@type": "Organization", "name": "Valid Co"}</script>
        "#;
        assert_eq!(candidates(html, Field::Name), vec!["Valid Co"]);
    }

    #[test]
    fn test_microdata() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/LocalBusiness">
              <span itemprop="name">Harbor Plumbing</span>
              <div itemprop="address" itemscope itemtype="https://schema.org/PostalAddress">
                <span itemprop="streetAddress">42 Harbor Rd</span>
                <span itemprop="addressLocality">Portland</span>
                <span itemprop="addressRegion">ME</span>
                <span itemprop="postalCode">04101</span>
              </div>
              <meta itemprop="telephone" content="207-555-0199">
            </div>
        "#;
        assert_eq!(candidates(html, Field::Name), vec!["Harbor Plumbing"]);
        assert_eq!(candidates(html, Field::Street), vec!["42 Harbor Rd"]);
        assert_eq!(candidates(html, Field::Zip), vec!["04101"]);
        assert_eq!(candidates(html, Field::Phone), vec!["207-555-0199"]);
    }

    #[test]
    fn test_microdata_name_skips_nested_scopes() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/LocalBusiness">
              <div itemprop="founder" itemscope itemtype="https://schema.org/Person">
                <span itemprop="name">Jane Doe</span>
              </div>
              <div itemprop="makesOffer" itemscope itemtype="https://schema.org/Offer">
                <span itemprop="name">Drain Cleaning</span>
              </div>
              <span itemprop="name">Harbor Plumbing</span>
            </div>
        "#;
        assert_eq!(candidates(html, Field::Name), vec!["Harbor Plumbing"]);
    }

    #[test]
    fn test_microdata_name_outside_organization_ignored() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Article">
              <span itemprop="name">Ten Plumbing Tips</span>
            </div>
        "#;
        assert!(candidates(html, Field::Name).is_empty());
    }

    #[test]
    fn test_non_organization_json_ld_ignored() {
        let html = r#"<script type="application/ld+json">{"@type": "Article", "name": "Blog"}</script>"#;
        assert!(candidates(html, Field::Name).is_empty());
    }
}
