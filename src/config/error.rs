//! Configuration error types

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration load error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors raised while validating configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Server port must not be 0")]
    InvalidPort,

    #[error("Request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Store file path must not be empty")]
    MissingStoreFile,

    #[error("AI interpreter is enabled but no API key is configured")]
    MissingApiKey,

    #[error("AI interpreter timeout must be between 1 and 60 seconds")]
    InvalidAiTimeout,
}
