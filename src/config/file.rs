use crate::utils::error::{Result, VerifyError};
use serde::{Deserialize, Serialize};

/// Optional TOML config file:
///
/// ```toml
/// [api]
/// key = "..."
/// base_url = "https://maps.googleapis.com/maps/api"
/// timeout_seconds = 5
///
/// [limits]
/// min_request_interval_ms = 100
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub limits: LimitsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsSection {
    pub min_request_interval_ms: Option<u64>,
}

impl FileConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| VerifyError::ConfigError {
            message: format!("Invalid config file {}: {}", path, e),
        })
    }
}
