use crate::domain::model::{GeocodeCandidate, PlaceDetails, PlaceSuggestion};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Outbound geocoding/place-search provider. Implementations own the
/// transport discipline (rate limiting, timeouts); callers only see
/// candidates or a provider-level failure to fall back from.
#[async_trait]
pub trait GeocodeApi: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeCandidate>>;
    async fn find_place(&self, query: &str) -> Result<Vec<GeocodeCandidate>>;
    async fn autocomplete(&self, query: &str, types: &[String]) -> Result<Vec<PlaceSuggestion>>;
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails>;

    /// Whether a key is configured. Without one the verifier skips the
    /// remote strategies entirely and never touches the network.
    fn has_api_key(&self) -> bool;
}

pub trait VerifierConfigProvider: Send + Sync {
    fn api_key(&self) -> Option<&str>;
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn min_request_interval(&self) -> Duration;
}
