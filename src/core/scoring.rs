use crate::domain::model::{AddressComponents, CompletenessResult, GeocodeCandidate};

/// Inputs longer than this are truncated before comparison.
const SIMILARITY_MAX_LEN: usize = 100;

/// Fast character-overlap ratio between two strings. Each character of the
/// shorter string greedily consumes the first unused matching position in
/// the longer one; the ratio is matched / longer.len(). Not an edit
/// distance: order-sensitive and O(n*m), which is fine at 100 chars.
pub fn char_overlap_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().take(SIMILARITY_MAX_LEN).collect();
    let b: Vec<char> = b.to_lowercase().chars().take(SIMILARITY_MAX_LEN).collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let mut used = vec![false; longer.len()];
    let mut matched = 0usize;

    for &c in shorter.iter() {
        let free_slot = longer
            .iter()
            .enumerate()
            .position(|(i, &l)| !used[i] && l == c);
        if let Some(i) = free_slot {
            used[i] = true;
            matched += 1;
        }
    }

    matched as f64 / longer.len() as f64
}

pub fn geocode_confidence(original: &str, candidate: &GeocodeCandidate) -> u8 {
    let mut score: i32 = 60;

    if candidate.types.iter().any(|t| t == "street_address") {
        score += 25;
    } else if candidate.types.iter().any(|t| t == "premise") {
        score += 20;
    } else if candidate.types.iter().any(|t| t == "route") {
        score += 15;
    }

    let similarity = char_overlap_similarity(original, &candidate.formatted_address);
    score += (15.0 * similarity).round() as i32;

    score.clamp(0, 100) as u8
}

pub fn place_search_confidence(original: &str, candidate: &GeocodeCandidate) -> u8 {
    let mut score: i32 = 50;

    if candidate
        .types
        .iter()
        .any(|t| matches!(t.as_str(), "establishment" | "restaurant" | "food"))
    {
        score += 30;
    }

    let similarity = char_overlap_similarity(original, &candidate.formatted_address);
    score += (20.0 * similarity).round() as i32;

    score.clamp(0, 100) as u8
}

/// Score how billing-grade precise an address is: all five structured
/// fields present scores 100, with textual penalties when the formatted
/// address looks like a broad area or has too little structure.
pub fn completeness(components: &AddressComponents, formatted_address: &str) -> CompletenessResult {
    let mut score: i32 = 0;
    let mut issues = Vec::new();

    if components.street_number.is_some() {
        score += 25;
    } else {
        issues.push("Missing building/house number".to_string());
    }

    if components.route.is_some() {
        score += 25;
    } else {
        issues.push("Missing street name".to_string());
    }

    if components.locality.is_some() {
        score += 25;
    } else {
        issues.push("Missing city/town".to_string());
    }

    if components.postal_code.is_some() {
        score += 15;
    } else {
        issues.push("Missing postal code".to_string());
    }

    if components.country.is_some() {
        score += 10;
    } else {
        issues.push("Missing country".to_string());
    }

    score = score.min(100);

    let lowered = formatted_address.to_lowercase();
    if [" city", " county", " district"]
        .iter()
        .any(|k| lowered.contains(k))
    {
        score -= 20;
        issues.push("Address appears to be a broad area, not a specific location".to_string());
    }

    if formatted_address.matches(',').count() <= 1 {
        score -= 15;
        issues.push("Address may be too generic".to_string());
    }

    let score = score.max(0) as u8;
    let is_complete = score >= 80 && issues.len() <= 1;

    CompletenessResult {
        score,
        issues,
        is_complete,
    }
}
