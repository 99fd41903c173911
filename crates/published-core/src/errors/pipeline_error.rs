//! Pipeline errors.

use super::error_code::PublishedErrorCode;
use super::{ConfigError, EmitError, GraphError, LoadError, QueryError};

/// Errors that can occur during a whitelist run.
/// Aggregates subsystem errors via `From` conversions. Every variant is
/// fatal: the run either writes the complete artifact or nothing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),
}

impl From<GraphError> for PipelineError {
    fn from(e: GraphError) -> Self {
        Self::Query(QueryError::Graph(e))
    }
}

impl PublishedErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Load(e) => e.error_code(),
            Self::Query(e) => e.error_code(),
            Self::Emit(e) => e.error_code(),
        }
    }
}
