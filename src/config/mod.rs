#[cfg(feature = "cli")]
pub mod cli;
pub mod file;

use crate::domain::ports::VerifierConfigProvider;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 100;
pub const API_KEY_ENV_VAR: &str = "GEOCODING_API_KEY";

/// Fully merged runtime settings: CLI flags over config file over
/// environment/defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub min_request_interval_ms: u64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            min_request_interval_ms: DEFAULT_MIN_REQUEST_INTERVAL_MS,
        }
    }
}

impl VerifierConfigProvider for ResolvedConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}
