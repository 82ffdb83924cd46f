use crate::core::parser::AddressParser;
use crate::core::scoring;
use crate::domain::model::{
    Coordinates, GeocodeCandidate, LocationVerification, PlaceDetails, PlaceSuggestion,
    VerificationSource,
};
use crate::domain::ports::GeocodeApi;
use crate::utils::error::{Result, VerifyError};
use chrono::Utc;

/// Remote lookup strategies, tried in order. Manual parsing is not listed:
/// it is the infallible terminal fallback, not a strategy that can fail.
const REMOTE_CHAIN: &[Strategy] = &[Strategy::Geocode, Strategy::FindPlace];

const STREET_COMPLETIONS: &[&str] = &["Street", "Avenue", "Road", "Drive", "Lane"];

/// Queries shorter than this get no generic fallback suggestions.
const MIN_FALLBACK_QUERY_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Geocode,
    FindPlace,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Geocode => write!(f, "geocoding"),
            Strategy::FindPlace => write!(f, "place search"),
        }
    }
}

/// Turns free-text addresses into verification records via an ordered
/// fallback chain: geocoding, then place search, then manual parsing.
pub struct AddressVerifier<A: GeocodeApi> {
    api: A,
    parser: AddressParser,
}

impl<A: GeocodeApi> AddressVerifier<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            parser: AddressParser::new(),
        }
    }

    /// Verify a single address. The only error is `EmptyAddress`; every
    /// remote failure degrades through the chain down to a manual result.
    pub async fn verify_address(&self, address: &str) -> Result<LocationVerification> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(VerifyError::EmptyAddress);
        }

        if self.api.has_api_key() {
            for strategy in REMOTE_CHAIN {
                match self.try_strategy(*strategy, trimmed).await {
                    Ok(verification) => return Ok(verification),
                    Err(e) => {
                        tracing::warn!("{} lookup failed, falling back: {}", strategy, e);
                    }
                }
            }
        } else {
            tracing::debug!("no API key configured, using manual parsing only");
        }

        Ok(self.verify_manually(trimmed))
    }

    async fn try_strategy(&self, strategy: Strategy, address: &str) -> Result<LocationVerification> {
        let candidates = match strategy {
            Strategy::Geocode => self.api.geocode(address).await?,
            Strategy::FindPlace => self.api.find_place(address).await?,
        };

        let candidate = candidates
            .into_iter()
            .next()
            .ok_or_else(|| VerifyError::ProviderStatus {
                status: "EMPTY_RESULT".to_string(),
            })?;

        Ok(self.build_remote_verification(strategy, address, candidate))
    }

    fn build_remote_verification(
        &self,
        strategy: Strategy,
        address: &str,
        mut candidate: GeocodeCandidate,
    ) -> LocationVerification {
        // place search returns no structured components; recover them from
        // the formatted address with the manual parser
        if candidate.components.is_empty() {
            candidate.components = self.parser.parse(&candidate.formatted_address);
        }

        let confidence = match strategy {
            Strategy::Geocode => scoring::geocode_confidence(address, &candidate),
            Strategy::FindPlace => scoring::place_search_confidence(address, &candidate),
        };
        let completeness = scoring::completeness(&candidate.components, &candidate.formatted_address);

        LocationVerification {
            address: address.to_string(),
            formatted_address: candidate.formatted_address,
            coordinates: candidate.location,
            verified: confidence >= 70 && completeness.is_complete,
            verification_source: VerificationSource::GooglePlaces,
            verification_date: Utc::now(),
            confidence,
            place_id: candidate.place_id,
            address_components: candidate.components,
            completeness,
        }
    }

    fn verify_manually(&self, address: &str) -> LocationVerification {
        let components = self.parser.parse(address);
        let confidence = self.parser.confidence(address, &components);
        let completeness = scoring::completeness(&components, address);

        LocationVerification {
            address: address.to_string(),
            formatted_address: address.to_string(),
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            verified: confidence >= 70 && completeness.is_complete,
            verification_source: VerificationSource::Manual,
            verification_date: Utc::now(),
            confidence,
            place_id: None,
            address_components: components,
            completeness,
        }
    }

    /// Autocomplete-style search. Provider failures and the missing-key
    /// case both degrade to heuristic suggestions; never errors.
    pub async fn search_places(
        &self,
        query: &str,
        types: &[String],
    ) -> Result<Vec<PlaceSuggestion>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        if self.api.has_api_key() {
            match self.api.autocomplete(trimmed, types).await {
                Ok(suggestions) => return Ok(suggestions),
                Err(e) => {
                    tracing::warn!("autocomplete lookup failed, using fallback: {}", e);
                }
            }
        }

        Ok(fallback_suggestions(trimmed))
    }

    pub async fn get_place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>> {
        if place_id.trim().is_empty() || !self.api.has_api_key() {
            return Ok(None);
        }

        match self.api.place_details(place_id).await {
            Ok(details) => Ok(Some(details)),
            Err(e) => {
                tracing::warn!("place details lookup failed: {}", e);
                Ok(None)
            }
        }
    }
}

/// Offline suggestions: a "<number> <word>" query gets street-type
/// completions; anything else needs at least MIN_FALLBACK_QUERY_LEN chars
/// to earn a few synthetic variants.
fn fallback_suggestions(query: &str) -> Vec<PlaceSuggestion> {
    if looks_like_number_and_street(query) {
        return STREET_COMPLETIONS
            .iter()
            .map(|street_type| PlaceSuggestion {
                description: format!("{} {}", query, street_type),
                place_id: None,
                types: vec!["route".to_string()],
            })
            .collect();
    }

    if query.chars().count() < MIN_FALLBACK_QUERY_LEN {
        return Vec::new();
    }

    [
        query.to_string(),
        format!("{}, UK", query),
        format!("{}, USA", query),
    ]
    .into_iter()
    .map(|description| PlaceSuggestion {
        description,
        place_id: None,
        types: vec!["geocode".to_string()],
    })
    .collect()
}

fn looks_like_number_and_street(query: &str) -> bool {
    let mut tokens = query.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(number), Some(word), None) => {
            number.chars().all(|c| c.is_ascii_digit()) && word.chars().all(|c| c.is_alphabetic())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AddressComponents;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockApi {
        has_key: bool,
        geocode_result: Option<Vec<GeocodeCandidate>>,
        find_place_result: Option<Vec<GeocodeCandidate>>,
        autocomplete_result: Option<Vec<PlaceSuggestion>>,
        details_result: Option<PlaceDetails>,
        geocode_calls: AtomicUsize,
        find_place_calls: AtomicUsize,
    }

    impl MockApi {
        fn with_key() -> Self {
            Self {
                has_key: true,
                ..Default::default()
            }
        }

        fn keyless() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl GeocodeApi for MockApi {
        async fn geocode(&self, _address: &str) -> Result<Vec<GeocodeCandidate>> {
            self.geocode_calls.fetch_add(1, Ordering::SeqCst);
            self.geocode_result
                .clone()
                .ok_or_else(|| VerifyError::ProviderStatus {
                    status: "OVER_QUERY_LIMIT".to_string(),
                })
        }

        async fn find_place(&self, _query: &str) -> Result<Vec<GeocodeCandidate>> {
            self.find_place_calls.fetch_add(1, Ordering::SeqCst);
            self.find_place_result
                .clone()
                .ok_or_else(|| VerifyError::ProviderStatus {
                    status: "ZERO_RESULTS".to_string(),
                })
        }

        async fn autocomplete(
            &self,
            _query: &str,
            _types: &[String],
        ) -> Result<Vec<PlaceSuggestion>> {
            self.autocomplete_result
                .clone()
                .ok_or_else(|| VerifyError::ProviderStatus {
                    status: "REQUEST_DENIED".to_string(),
                })
        }

        async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
            self.details_result
                .clone()
                .ok_or_else(|| VerifyError::ProviderStatus {
                    status: format!("NOT_FOUND: {}", place_id),
                })
        }

        fn has_api_key(&self) -> bool {
            self.has_key
        }
    }

    fn street_candidate() -> GeocodeCandidate {
        GeocodeCandidate {
            formatted_address: "40 Ardaveen Avenue, Newry BT35 8UJ, UK".to_string(),
            location: Coordinates {
                lat: 54.1751,
                lng: -6.3402,
            },
            place_id: Some("place-123".to_string()),
            types: vec!["street_address".to_string()],
            components: AddressComponents {
                street_number: Some("40".to_string()),
                route: Some("Ardaveen Avenue".to_string()),
                locality: Some("Newry".to_string()),
                country: Some("United Kingdom".to_string()),
                postal_code: Some("BT35 8UJ".to_string()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_empty_address_is_rejected() {
        let verifier = AddressVerifier::new(MockApi::keyless());
        let result = verifier.verify_address("   ").await;
        assert!(matches!(result, Err(VerifyError::EmptyAddress)));
    }

    #[tokio::test]
    async fn test_geocode_success_short_circuits_chain() {
        let mut api = MockApi::with_key();
        api.geocode_result = Some(vec![street_candidate()]);
        let verifier = AddressVerifier::new(api);

        let verification = verifier
            .verify_address("40 Ardaveen Ave, Newry BT35 8UJ, UK")
            .await
            .unwrap();

        assert_eq!(
            verification.verification_source,
            VerificationSource::GooglePlaces
        );
        assert!(verification.confidence >= 70);
        assert!(verification.verified);
        assert_eq!(verification.place_id.as_deref(), Some("place-123"));
        assert_eq!(
            verifier.api.find_place_calls.load(Ordering::SeqCst),
            0,
            "place search must not run when geocoding succeeds"
        );
    }

    #[tokio::test]
    async fn test_geocode_failure_falls_back_to_place_search() {
        let mut api = MockApi::with_key();
        api.find_place_result = Some(vec![GeocodeCandidate {
            types: vec!["establishment".to_string()],
            components: AddressComponents::default(),
            ..street_candidate()
        }]);
        let verifier = AddressVerifier::new(api);

        let verification = verifier
            .verify_address("40 Ardaveen Ave, Newry BT35 8UJ, UK")
            .await
            .unwrap();

        assert_eq!(verifier.api.geocode_calls.load(Ordering::SeqCst), 1);
        assert_eq!(verifier.api.find_place_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            verification.verification_source,
            VerificationSource::GooglePlaces
        );
        // components were recovered from the formatted address
        assert_eq!(
            verification.address_components.street_number.as_deref(),
            Some("40")
        );
    }

    #[tokio::test]
    async fn test_both_remote_failures_produce_manual_result() {
        let verifier = AddressVerifier::new(MockApi::with_key());

        let verification = verifier
            .verify_address("40 Ardaveen Ave, Newry BT35 8UJ, UK")
            .await
            .unwrap();

        assert_eq!(verifier.api.geocode_calls.load(Ordering::SeqCst), 1);
        assert_eq!(verifier.api.find_place_calls.load(Ordering::SeqCst), 1);
        assert_eq!(verification.verification_source, VerificationSource::Manual);
        assert!((30..=95).contains(&verification.confidence));
        assert!(verification.completeness.score >= 90);
    }

    #[tokio::test]
    async fn test_no_api_key_never_calls_network() {
        let verifier = AddressVerifier::new(MockApi::keyless());

        let verification = verifier
            .verify_address("40 Ardaveen Ave, Newry BT35 8UJ, UK")
            .await
            .unwrap();

        assert_eq!(verifier.api.geocode_calls.load(Ordering::SeqCst), 0);
        assert_eq!(verifier.api.find_place_calls.load(Ordering::SeqCst), 0);
        assert_eq!(verification.verification_source, VerificationSource::Manual);
    }

    #[tokio::test]
    async fn test_manual_scenario_extracts_all_components() {
        let verifier = AddressVerifier::new(MockApi::keyless());

        let verification = verifier
            .verify_address("40 Ardaveen Ave, Newry BT35 8UJ, UK")
            .await
            .unwrap();

        let components = &verification.address_components;
        assert_eq!(components.street_number.as_deref(), Some("40"));
        assert_eq!(components.route.as_deref(), Some("Ardaveen Ave"));
        assert_eq!(components.locality.as_deref(), Some("Newry"));
        assert_eq!(components.postal_code.as_deref(), Some("BT35 8UJ"));
        assert_eq!(components.country.as_deref(), Some("United Kingdom"));
        assert!(verification.completeness.score >= 90);
        assert!((30..=95).contains(&verification.confidence));
    }

    #[tokio::test]
    async fn test_verified_flag_matches_invariant() {
        let verifier = AddressVerifier::new(MockApi::keyless());

        for address in [
            "40 Ardaveen Ave, Newry BT35 8UJ, UK",
            "London",
            "123 Main Street, Springfield 62704, USA",
            "nowhere in particular",
        ] {
            let v = verifier.verify_address(address).await.unwrap();
            assert_eq!(
                v.verified,
                v.confidence >= 70 && v.completeness.is_complete,
                "invariant violated for {}",
                address
            );
            assert_eq!(
                v.completeness.is_complete,
                v.completeness.score >= 80 && v.completeness.issues.len() <= 1,
                "completeness invariant violated for {}",
                address
            );
        }
    }

    #[tokio::test]
    async fn test_verification_is_deterministic() {
        let verifier = AddressVerifier::new(MockApi::keyless());
        let address = "40 Ardaveen Ave, Newry BT35 8UJ, UK";

        let first = verifier.verify_address(address).await.unwrap();
        let second = verifier.verify_address(address).await.unwrap();

        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.completeness, second.completeness);
        assert_eq!(first.address_components, second.address_components);
    }

    #[tokio::test]
    async fn test_search_short_query_without_key_is_empty() {
        let verifier = AddressVerifier::new(MockApi::keyless());
        let suggestions = verifier.search_places("ab", &[]).await.unwrap();
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_search_number_street_query_gets_completions() {
        let verifier = AddressVerifier::new(MockApi::keyless());
        let suggestions = verifier.search_places("123 Main", &[]).await.unwrap();

        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[0].description, "123 Main Street");
        assert!(suggestions
            .iter()
            .all(|s| s.description.starts_with("123 Main ")));
    }

    #[tokio::test]
    async fn test_search_long_query_gets_synthetic_suggestions() {
        let verifier = AddressVerifier::new(MockApi::keyless());
        let suggestions = verifier
            .search_places("Ardaveen Avenue Newry", &[])
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].description, "Ardaveen Avenue Newry");
    }

    #[tokio::test]
    async fn test_search_provider_failure_uses_fallback() {
        let verifier = AddressVerifier::new(MockApi::with_key());
        let suggestions = verifier.search_places("123 Main", &[]).await.unwrap();
        assert_eq!(suggestions.len(), 5);
    }

    #[tokio::test]
    async fn test_search_provider_success_passes_through() {
        let mut api = MockApi::with_key();
        api.autocomplete_result = Some(vec![PlaceSuggestion {
            description: "40 Ardaveen Avenue, Newry, UK".to_string(),
            place_id: Some("p1".to_string()),
            types: vec!["geocode".to_string()],
        }]);
        let verifier = AddressVerifier::new(api);

        let suggestions = verifier.search_places("40 Ardaveen", &[]).await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].place_id.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_place_details_absorbs_failures() {
        let verifier = AddressVerifier::new(MockApi::with_key());
        assert!(verifier.get_place_details("missing").await.unwrap().is_none());

        let keyless = AddressVerifier::new(MockApi::keyless());
        assert!(keyless.get_place_details("any").await.unwrap().is_none());
    }
}
