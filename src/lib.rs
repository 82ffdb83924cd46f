pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::places::PlacesClient;
pub use config::ResolvedConfig;
pub use core::{rate_limit::RateLimiter, verifier::AddressVerifier};
pub use domain::model::{
    AddressComponents, CompletenessResult, Coordinates, LocationVerification, PlaceDetails,
    PlaceSuggestion, VerificationSource,
};
pub use utils::error::{Result, VerifyError};
