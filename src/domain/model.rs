use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured address pieces extracted from a provider response or parsed
/// manually out of the raw address text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl AddressComponents {
    pub fn is_empty(&self) -> bool {
        self.street_number.is_none()
            && self.route.is_none()
            && self.locality.is_none()
            && self.administrative_area_level_1.is_none()
            && self.administrative_area_level_2.is_none()
            && self.country.is_none()
            && self.postal_code.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// How well the address covers the fields needed for a billing-grade
/// location. `is_complete` holds exactly when score >= 80 and at most one
/// issue was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessResult {
    pub score: u8,
    pub issues: Vec<String>,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationSource {
    GooglePlaces,
    Manual,
}

impl std::fmt::Display for VerificationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationSource::GooglePlaces => write!(f, "google_places"),
            VerificationSource::Manual => write!(f, "manual"),
        }
    }
}

/// The verification record returned for every non-empty address.
///
/// Invariant: `verified == (confidence >= 70 && completeness.is_complete)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationVerification {
    pub address: String,
    pub formatted_address: String,
    pub coordinates: Coordinates,
    pub verified: bool,
    pub verification_source: VerificationSource,
    pub verification_date: DateTime<Utc>,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub address_components: AddressComponents,
    pub completeness: CompletenessResult,
}

/// Provider-neutral shape produced by the remote lookup strategies.
#[derive(Debug, Clone)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub location: Coordinates,
    pub place_id: Option<String>,
    pub types: Vec<String>,
    pub components: AddressComponents,
}

/// Autocomplete-style suggestion returned by place search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    pub types: Vec<String>,
    pub components: AddressComponents,
}
