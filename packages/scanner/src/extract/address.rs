//! Splitting free-form address text into street / city / state / zip.

use lazy_static::lazy_static;
use regex::Regex;

use super::validate::clean_text;

lazy_static! {
    // "Springfield, IL 62701", "San Francisco CA 94105-1234",
    // "123 Main St, Springfield, IL 62701"
    static ref CITY_STATE_ZIP: Regex = Regex::new(
        r"^(?P<head>.+?),?\s+(?P<state>[A-Za-z]{2})\.?,?\s+(?P<zip>\d{5}(?:-\d{4})?)$"
    ).unwrap();
}

/// Address components found in free text. Missing parts are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl AddressParts {
    pub fn is_empty(&self) -> bool {
        self.street.is_none() && self.city.is_none() && self.state.is_none() && self.zip.is_none()
    }
}

/// Split address lines (as found in an `<address>` block) into components.
///
/// The first line shaped like `City, ST 12345` provides city, state and zip.
/// The street is taken from that same line when it carries a leading
/// `street,` part, otherwise from the nearest preceding line that contains a
/// digit, otherwise from the line right above it. Lines that are all one
/// string (`"123 Main St, Springfield, IL 62701"`) work too.
pub fn parse_address_lines(lines: &[String]) -> AddressParts {
    let lines: Vec<String> = lines
        .iter()
        .map(|l| clean_text(l).trim_end_matches(',').to_string())
        .filter(|l| !l.is_empty())
        .collect();

    let mut parts = AddressParts::default();

    let Some((idx, caps)) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| CITY_STATE_ZIP.captures(line).map(|c| (i, c)))
    else {
        // No city/state/zip line; a leading house number still marks a street.
        parts.street = lines
            .iter()
            .find(|l| l.starts_with(|c: char| c.is_ascii_digit()))
            .cloned();
        return parts;
    };

    let head = caps["head"].trim();
    match head.rsplit_once(',') {
        Some((street, city)) => {
            parts.street = non_empty(street);
            parts.city = non_empty(city);
        }
        None => parts.city = non_empty(head),
    }
    parts.state = Some(caps["state"].to_ascii_uppercase());
    parts.zip = Some(caps["zip"].to_string());

    if parts.street.is_none() && idx > 0 {
        let above = &lines[..idx];
        parts.street = above
            .iter()
            .rev()
            .find(|l| l.chars().any(|c| c.is_ascii_digit()))
            .or_else(|| above.last())
            .cloned();
    }

    parts
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim().trim_matches(',').trim();
    (!s.is_empty()).then(|| s.to_string())
}
