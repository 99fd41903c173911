//! Errors returned by node queries, raw or filtered.

use super::error_code::{self, PublishedErrorCode};
use super::GraphError;

/// Errors that can occur while answering a node-shaped query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The underlying graph failed. Propagated as-is.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The answer's shape does not match the query's declared element kind.
    #[error("Unsupported answer shape for query {query}: {detail}")]
    UnsupportedQueryShape { query: &'static str, detail: String },
}

impl PublishedErrorCode for QueryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::UnsupportedQueryShape { .. } => error_code::UNSUPPORTED_QUERY_SHAPE,
        }
    }
}
