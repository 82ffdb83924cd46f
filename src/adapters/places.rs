use crate::core::rate_limit::RateLimiter;
use crate::domain::model::{
    AddressComponents, Coordinates, GeocodeCandidate, PlaceDetails, PlaceSuggestion,
};
use crate::domain::ports::{GeocodeApi, VerifierConfigProvider};
use crate::utils::error::{Result, VerifyError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

const FIND_PLACE_FIELDS: &str = "name,formatted_address,geometry,place_id,types";
const DETAILS_FIELDS: &str = "name,formatted_address,geometry,place_id,types,address_components";

/// HTTP client for the geocoding/places provider. Every request goes
/// through the shared rate limiter and the client-level timeout.
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    limiter: Arc<RateLimiter>,
}

impl PlacesClient {
    pub fn new<C: VerifierConfigProvider>(config: &C, limiter: Arc<RateLimiter>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            limiter,
        })
    }

    fn key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(VerifyError::MissingApiKey)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        self.limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("requesting {}", url);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        tracing::debug!("provider response status: {}", status);
        if !status.is_success() {
            return Err(VerifyError::ProviderStatus {
                status: format!("HTTP {}", status.as_u16()),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GeocodeApi for PlacesClient {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeCandidate>> {
        let key = self.key()?;
        let body: GeocodeResponse = self
            .get_json("/geocode/json", &[("address", address), ("key", key)])
            .await?;

        if body.status != "OK" {
            return Err(VerifyError::ProviderStatus {
                status: body.status,
            });
        }
        if body.results.is_empty() {
            return Err(VerifyError::ProviderStatus {
                status: "EMPTY_RESULT".to_string(),
            });
        }

        Ok(body.results.into_iter().map(GeocodeCandidate::from).collect())
    }

    async fn find_place(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let key = self.key()?;
        let body: FindPlaceResponse = self
            .get_json(
                "/place/findplacefromtext/json",
                &[
                    ("input", query),
                    ("inputtype", "textquery"),
                    ("fields", FIND_PLACE_FIELDS),
                    ("key", key),
                ],
            )
            .await?;

        if body.status != "OK" {
            return Err(VerifyError::ProviderStatus {
                status: body.status,
            });
        }

        let candidates: Vec<GeocodeCandidate> = body
            .candidates
            .into_iter()
            .filter_map(|c| c.into_candidate())
            .collect();
        if candidates.is_empty() {
            return Err(VerifyError::ProviderStatus {
                status: "EMPTY_RESULT".to_string(),
            });
        }

        Ok(candidates)
    }

    async fn autocomplete(&self, query: &str, types: &[String]) -> Result<Vec<PlaceSuggestion>> {
        let key = self.key()?;
        let joined_types = types.join("|");
        let mut params = vec![("input", query), ("key", key)];
        if !types.is_empty() {
            params.push(("types", joined_types.as_str()));
        }

        let body: AutocompleteResponse = self.get_json("/place/autocomplete/json", &params).await?;

        if body.status != "OK" {
            return Err(VerifyError::ProviderStatus {
                status: body.status,
            });
        }

        Ok(body
            .predictions
            .into_iter()
            .map(|p| PlaceSuggestion {
                description: p.description,
                place_id: p.place_id,
                types: p.types,
            })
            .collect())
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails> {
        let key = self.key()?;
        let body: DetailsResponse = self
            .get_json(
                "/place/details/json",
                &[
                    ("place_id", place_id),
                    ("fields", DETAILS_FIELDS),
                    ("key", key),
                ],
            )
            .await?;

        if body.status != "OK" {
            return Err(VerifyError::ProviderStatus {
                status: body.status,
            });
        }

        let result = body.result.ok_or_else(|| VerifyError::ProviderStatus {
            status: "EMPTY_RESULT".to_string(),
        })?;

        Ok(PlaceDetails {
            place_id: result.place_id.unwrap_or_else(|| place_id.to_string()),
            name: result.name,
            formatted_address: result.formatted_address,
            location: result.geometry.map(|g| g.location.into()),
            types: result.types,
            components: map_components(result.address_components),
        })
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

// -- provider wire format --

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
    place_id: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    address_components: Vec<WireComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: WireLatLng,
}

#[derive(Debug, Deserialize)]
struct WireLatLng {
    lat: f64,
    lng: f64,
}

impl From<WireLatLng> for Coordinates {
    fn from(value: WireLatLng) -> Self {
        Coordinates {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    status: String,
    #[serde(default)]
    candidates: Vec<FindPlaceCandidate>,
}

#[derive(Debug, Deserialize)]
struct FindPlaceCandidate {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    place_id: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    description: String,
    place_id: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    place_id: Option<String>,
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    address_components: Vec<WireComponent>,
}

impl From<GeocodeResult> for GeocodeCandidate {
    fn from(result: GeocodeResult) -> Self {
        GeocodeCandidate {
            formatted_address: result.formatted_address,
            location: result.geometry.location.into(),
            place_id: result.place_id,
            types: result.types,
            components: map_components(result.address_components),
        }
    }
}

impl FindPlaceCandidate {
    /// A candidate without an address or coordinates cannot be scored and
    /// is skipped.
    fn into_candidate(self) -> Option<GeocodeCandidate> {
        let formatted_address = self.formatted_address?;
        let location = self.geometry?.location.into();
        Some(GeocodeCandidate {
            formatted_address,
            location,
            place_id: self.place_id,
            types: self.types,
            // find-place responses carry no structured components
            components: AddressComponents::default(),
        })
    }
}

fn map_components(wire: Vec<WireComponent>) -> AddressComponents {
    let mut components = AddressComponents::default();
    let mut postal_town: Option<String> = None;

    for component in wire {
        let name = component.long_name;
        if component.types.iter().any(|t| t == "street_number") {
            components.street_number = Some(name);
        } else if component.types.iter().any(|t| t == "route") {
            components.route = Some(name);
        } else if component.types.iter().any(|t| t == "locality") {
            components.locality = Some(name);
        } else if component.types.iter().any(|t| t == "postal_town") {
            postal_town = Some(name);
        } else if component
            .types
            .iter()
            .any(|t| t == "administrative_area_level_1")
        {
            components.administrative_area_level_1 = Some(name);
        } else if component
            .types
            .iter()
            .any(|t| t == "administrative_area_level_2")
        {
            components.administrative_area_level_2 = Some(name);
        } else if component.types.iter().any(|t| t == "country") {
            components.country = Some(name);
        } else if component.types.iter().any(|t| t == "postal_code") {
            components.postal_code = Some(name);
        }
    }

    // UK responses often carry postal_town instead of locality
    if components.locality.is_none() {
        components.locality = postal_town;
    }

    components
}
