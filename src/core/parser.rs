use crate::domain::model::AddressComponents;
use regex::Regex;

/// Street-type words that mark a segment as a road name.
const STREET_KEYWORDS: &[&str] = &[
    "street",
    "st",
    "road",
    "rd",
    "avenue",
    "ave",
    "lane",
    "ln",
    "drive",
    "dr",
    "close",
    "court",
    "ct",
    "place",
    "pl",
    "way",
    "boulevard",
    "blvd",
    "terrace",
    "crescent",
    "gardens",
    "grove",
    "park",
    "square",
    "hill",
    "green",
    "row",
    "walk",
    "mews",
];

const CITY_KEYWORDS: &[&str] = &["city", "town", "village", "borough"];

/// Keyword -> canonical country name. Checked in order, so multi-word
/// entries must come before their single-word suffixes ("northern ireland"
/// before "ireland").
const COUNTRY_KEYWORDS: &[(&str, &str)] = &[
    ("united kingdom", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("northern ireland", "United Kingdom"),
    ("england", "United Kingdom"),
    ("scotland", "United Kingdom"),
    ("wales", "United Kingdom"),
    ("uk", "United Kingdom"),
    ("gb", "United Kingdom"),
    ("united states", "United States"),
    ("usa", "United States"),
    ("america", "United States"),
    ("canada", "Canada"),
    ("ireland", "Ireland"),
    ("australia", "Australia"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostalKind {
    Uk,
    Us,
    Ca,
}

#[derive(Debug, Clone)]
struct PostalMatch {
    text: String,
    kind: PostalKind,
    segment: usize,
}

/// Heuristic fallback parser: splits a raw address on commas and scans the
/// segments with fixed tables and postal-code patterns. Best-effort only;
/// unparsed fields stay `None`.
pub struct AddressParser {
    uk_postcode: Regex,
    us_zip: Regex,
    ca_postcode: Regex,
    leading_number: Regex,
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressParser {
    pub fn new() -> Self {
        Self {
            uk_postcode: Regex::new(r"(?i)\b[A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2}\b")
                .expect("valid UK postcode pattern"),
            us_zip: Regex::new(r"\b\d{5}(-\d{4})?\b").expect("valid US zip pattern"),
            ca_postcode: Regex::new(r"(?i)\b[A-Z]\d[A-Z]\s*\d[A-Z]\d\b")
                .expect("valid Canadian postcode pattern"),
            leading_number: Regex::new(r"^(\d+[A-Za-z]?)\s+(.+)$")
                .expect("valid street number pattern"),
        }
    }

    pub fn parse(&self, address: &str) -> AddressComponents {
        let mut components = AddressComponents::default();
        let segments: Vec<&str> = address
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return components;
        }

        let postal = self.find_postal_code(&segments);
        if let Some(found) = &postal {
            components.postal_code = Some(found.text.clone());
        }

        // country keyword on the last segment wins over postcode inference
        let mut country_from_last = false;
        if let Some(last) = segments.last() {
            if let Some(canonical) = country_keyword(last) {
                components.country = Some(canonical.to_string());
                country_from_last = true;
            }
        }
        if components.country.is_none() {
            if let Some(found) = &postal {
                components.country = match found.kind {
                    PostalKind::Uk => Some("United Kingdom".to_string()),
                    PostalKind::Ca => Some("Canada".to_string()),
                    // a bare 5-digit code is too ambiguous to name a country
                    PostalKind::Us => None,
                };
            }
        }

        if let Some(caps) = self.leading_number.captures(segments[0]) {
            components.street_number = Some(caps[1].to_string());
            let route = caps[2].trim();
            if !route.is_empty() {
                components.route = Some(route.to_string());
            }
        } else if contains_street_keyword(segments[0]) {
            components.route = Some(segments[0].to_string());
        }

        let locality_idx = if country_from_last && segments.len() >= 2 {
            segments.len() - 2
        } else {
            segments.len() - 1
        };
        components.locality = self.extract_locality(&segments, locality_idx, &postal, &components);

        components
    }

    /// Locality comes from the chosen segment with any postal code stripped
    /// out. A segment that was already consumed as street number/route, or
    /// that is empty after stripping, yields nothing; in the latter case the
    /// preceding segment is tried once.
    fn extract_locality(
        &self,
        segments: &[&str],
        index: usize,
        postal: &Option<PostalMatch>,
        components: &AddressComponents,
    ) -> Option<String> {
        let street_consumed_first =
            components.street_number.is_some() || components.route.is_some();

        let candidate_at = |idx: usize| -> Option<String> {
            if idx == 0 && street_consumed_first {
                return None;
            }
            let mut text = segments[idx].to_string();
            if let Some(found) = postal {
                if found.segment == idx {
                    text = text.replace(&found.text, "");
                }
            }
            let text = text
                .trim_matches(|c: char| c.is_whitespace() || c == ',')
                .to_string();
            (!text.is_empty()).then_some(text)
        };

        candidate_at(index).or_else(|| {
            if index > 0 {
                candidate_at(index - 1)
            } else {
                None
            }
        })
    }

    fn find_postal_code(&self, segments: &[&str]) -> Option<PostalMatch> {
        let patterns = [
            (&self.uk_postcode, PostalKind::Uk),
            (&self.us_zip, PostalKind::Us),
            (&self.ca_postcode, PostalKind::Ca),
        ];
        for (i, segment) in segments.iter().enumerate() {
            for (regex, kind) in &patterns {
                if let Some(m) = regex.find(segment) {
                    return Some(PostalMatch {
                        text: m.as_str().to_string(),
                        kind: *kind,
                        segment: i,
                    });
                }
            }
        }
        None
    }

    /// Confidence score for an address that only went through manual
    /// parsing. Clamped to [30, 95]: manual results are never fully
    /// trusted, but never worthless either.
    pub fn confidence(&self, address: &str, components: &AddressComponents) -> u8 {
        let mut score: i32 = 30;

        if address
            .trim()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
        {
            score += 25;
        }

        if contains_street_keyword(address) {
            score += 20;
        }

        if CITY_KEYWORDS.iter().any(|k| keyword_in(address, k)) {
            score += 10;
        }

        if self.uk_postcode.is_match(address)
            || self.us_zip.is_match(address)
            || self.ca_postcode.is_match(address)
        {
            score += 15;
        }

        if COUNTRY_KEYWORDS.iter().any(|(k, _)| keyword_in(address, k)) {
            score += 10;
        }

        let segment_count = address.split(',').filter(|s| !s.trim().is_empty()).count();
        if segment_count >= 3 {
            score += 15;
        }

        let parsed_fields = [
            &components.street_number,
            &components.route,
            &components.locality,
            &components.postal_code,
            &components.country,
        ];
        score += 5 * parsed_fields.iter().filter(|f| f.is_some()).count() as i32;

        score.clamp(30, 95) as u8
    }
}

fn contains_street_keyword(text: &str) -> bool {
    STREET_KEYWORDS.iter().any(|k| keyword_in(text, k))
}

fn country_keyword(segment: &str) -> Option<&'static str> {
    COUNTRY_KEYWORDS
        .iter()
        .find(|(keyword, _)| keyword_in(segment, keyword))
        .map(|(_, canonical)| *canonical)
}

/// Whole-word (or whole-phrase) match, ignoring case and punctuation.
fn keyword_in(text: &str, keyword: &str) -> bool {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let padded = format!(" {} ", normalized.split_whitespace().collect::<Vec<_>>().join(" "));
    padded.contains(&format!(" {} ", keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> AddressParser {
        AddressParser::new()
    }

    #[test]
    fn test_parse_uk_address_with_postcode_segment() {
        let components = parser().parse("40 Ardaveen Ave, Newry BT35 8UJ, UK");

        assert_eq!(components.street_number.as_deref(), Some("40"));
        assert_eq!(components.route.as_deref(), Some("Ardaveen Ave"));
        assert_eq!(components.locality.as_deref(), Some("Newry"));
        assert_eq!(components.postal_code.as_deref(), Some("BT35 8UJ"));
        assert_eq!(components.country.as_deref(), Some("United Kingdom"));
    }

    #[test]
    fn test_parse_postcode_in_own_segment_falls_back_for_locality() {
        let components = parser().parse("40 Ardaveen Ave, Newry, BT35 8UJ");

        assert_eq!(components.postal_code.as_deref(), Some("BT35 8UJ"));
        assert_eq!(components.country.as_deref(), Some("United Kingdom"));
        assert_eq!(components.locality.as_deref(), Some("Newry"));
    }

    #[test]
    fn test_parse_us_address() {
        let components = parser().parse("123 Main Street, Springfield 62704, USA");

        assert_eq!(components.street_number.as_deref(), Some("123"));
        assert_eq!(components.route.as_deref(), Some("Main Street"));
        assert_eq!(components.locality.as_deref(), Some("Springfield"));
        assert_eq!(components.postal_code.as_deref(), Some("62704"));
        assert_eq!(components.country.as_deref(), Some("United States"));
    }

    #[test]
    fn test_parse_us_zip_does_not_infer_country() {
        let components = parser().parse("123 Main Street, Springfield 62704");
        assert_eq!(components.postal_code.as_deref(), Some("62704"));
        assert_eq!(components.country, None);
    }

    #[test]
    fn test_parse_canadian_postcode_infers_canada() {
        let components = parser().parse("12 Maple Drive, Toronto M5V 2T6");

        assert_eq!(components.postal_code.as_deref(), Some("M5V 2T6"));
        assert_eq!(components.country.as_deref(), Some("Canada"));
        assert_eq!(components.locality.as_deref(), Some("Toronto"));
    }

    #[test]
    fn test_uk_pattern_tried_before_us() {
        let components = parser().parse("1 High Street, EC1A 1BB 12345, UK");
        assert_eq!(components.postal_code.as_deref(), Some("EC1A 1BB"));
    }

    #[test]
    fn test_country_keyword_beats_postcode_inference() {
        // UK-shaped postcode but the last segment names Ireland
        let components = parser().parse("5 Quay Street, Dublin D02 AF30, Ireland");
        assert_eq!(components.country.as_deref(), Some("Ireland"));
    }

    #[test]
    fn test_no_leading_number_with_street_keyword() {
        let components = parser().parse("Downing Street, London, UK");

        assert_eq!(components.street_number, None);
        assert_eq!(components.route.as_deref(), Some("Downing Street"));
        assert_eq!(components.locality.as_deref(), Some("London"));
        assert_eq!(components.country.as_deref(), Some("United Kingdom"));
    }

    #[test]
    fn test_single_segment_city_only() {
        let components = parser().parse("London");

        assert_eq!(components.street_number, None);
        assert_eq!(components.route, None);
        assert_eq!(components.locality.as_deref(), Some("London"));
    }

    #[test]
    fn test_single_segment_street_not_taken_as_locality() {
        let components = parser().parse("40 High Street");

        assert_eq!(components.street_number.as_deref(), Some("40"));
        assert_eq!(components.route.as_deref(), Some("High Street"));
        assert_eq!(components.locality, None);
    }

    #[test]
    fn test_parse_empty_and_comma_only_input() {
        assert!(parser().parse("").is_empty());
        assert!(parser().parse(", ,").is_empty());
    }

    #[test]
    fn test_street_number_with_letter_suffix() {
        let components = parser().parse("12b Baker Street, London, UK");
        assert_eq!(components.street_number.as_deref(), Some("12b"));
        assert_eq!(components.route.as_deref(), Some("Baker Street"));
    }

    #[test]
    fn test_manual_confidence_rich_address_hits_cap() {
        let p = parser();
        let address = "40 Ardaveen Ave, Newry BT35 8UJ, UK";
        let components = p.parse(address);

        // 30 base + 25 number + 20 street + 15 postal + 10 country
        // + 15 segments + 25 parsed fields, clamped to the manual ceiling
        assert_eq!(p.confidence(address, &components), 95);
    }

    #[test]
    fn test_manual_confidence_floor() {
        let p = parser();
        let address = "???";
        let components = p.parse(address);
        assert_eq!(p.confidence(address, &components), 35);
    }

    #[test]
    fn test_manual_confidence_within_bounds() {
        let p = parser();
        for address in [
            "London",
            "40 High Street",
            "1 Infinite Loop, Cupertino 95014, USA",
            "some unstructured text with no address shape",
        ] {
            let components = p.parse(address);
            let confidence = p.confidence(address, &components);
            assert!((30..=95).contains(&confidence), "{}: {}", address, confidence);
        }
    }

    #[test]
    fn test_keyword_matching_is_word_bounded() {
        // "stone" must not match the "st" street keyword
        assert!(!contains_street_keyword("Stonehenge"));
        assert!(contains_street_keyword("12 Baker St."));
        assert_eq!(country_keyword("Ukraine"), None);
        assert_eq!(country_keyword("UK"), Some("United Kingdom"));
    }
}
