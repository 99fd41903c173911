//! Configuration errors.

use super::error_code::{self, PublishedErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Output file must be specified (e.g. --output openApi.config)")]
    MissingOutput,
}

impl PublishedErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingOutput => error_code::MISSING_OUTPUT,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
