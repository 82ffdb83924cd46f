pub mod parser;
pub mod rate_limit;
pub mod scoring;
pub mod verifier;

pub use crate::domain::model::{
    AddressComponents, CompletenessResult, Coordinates, GeocodeCandidate, LocationVerification,
    PlaceDetails, PlaceSuggestion, VerificationSource,
};
pub use crate::domain::ports::{GeocodeApi, VerifierConfigProvider};
pub use crate::utils::error::Result;
