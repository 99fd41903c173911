//! Whitelist emission errors.

use std::path::PathBuf;

use super::error_code::{self, PublishedErrorCode};

/// Errors that can occur while writing the whitelist artifact.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Failed to write file {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Failed to serialize graph snapshot: {0}")]
    Serialize(String),
}

impl PublishedErrorCode for EmitError {
    fn error_code(&self) -> &'static str {
        error_code::EMIT_ERROR
    }
}
