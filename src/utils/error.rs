use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Address cannot be empty")]
    EmptyAddress,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Geocoding provider returned status: {status}")]
    ProviderStatus { status: String },

    #[error("API key not configured")]
    MissingApiKey,

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, VerifyError>;
