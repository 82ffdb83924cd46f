use crate::config::file::FileConfig;
use crate::config::{
    ResolvedConfig, API_KEY_ENV_VAR, DEFAULT_BASE_URL, DEFAULT_MIN_REQUEST_INTERVAL_MS,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::utils::error::{Result, VerifyError};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "addr-verify")]
#[command(about = "Verify free-text addresses and score their completeness")]
pub struct CliConfig {
    /// Single address to verify
    #[arg(long)]
    pub address: Option<String>,

    /// Autocomplete-style place search query
    #[arg(long)]
    pub search: Option<String>,

    /// Restrict place search to these provider types
    #[arg(long, value_delimiter = ',')]
    pub search_types: Vec<String>,

    /// Look up details for a place id
    #[arg(long)]
    pub details: Option<String>,

    /// CSV file with an `address` column for batch verification
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "./verified.csv")]
    pub output: String,

    /// TOML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Geocoding API key (falls back to config file, then GEOCODING_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub min_request_interval_ms: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Merge CLI flags with the config file and environment into the final
    /// runtime settings. Flags win over the file, the file over env/defaults.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        let api_key = self
            .api_key
            .clone()
            .or_else(|| file.api.key.clone())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.trim().is_empty());

        Ok(ResolvedConfig {
            api_key,
            base_url: self
                .base_url
                .clone()
                .or_else(|| file.api.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_seconds: self
                .timeout_seconds
                .or(file.api.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            min_request_interval_ms: self
                .min_request_interval_ms
                .or(file.limits.min_request_interval_ms)
                .unwrap_or(DEFAULT_MIN_REQUEST_INTERVAL_MS),
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.address.is_none()
            && self.search.is_none()
            && self.details.is_none()
            && self.input.is_none()
        {
            return Err(VerifyError::MissingConfigError {
                field: "address, search, details or input".to_string(),
            });
        }

        if let Some(base_url) = &self.base_url {
            validate_url("base_url", base_url)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 60)?;
        }
        if let Some(interval) = self.min_request_interval_ms {
            validate_range("min_request_interval_ms", interval, 0, 10_000)?;
        }
        if let Some(api_key) = &self.api_key {
            validate_non_empty_string("api_key", api_key)?;
        }
        if let Some(input) = &self.input {
            validate_path("input", input)?;
            validate_file_extension("input", input, &["csv"])?;
            validate_path("output", &self.output)?;
        }

        Ok(())
    }
}
