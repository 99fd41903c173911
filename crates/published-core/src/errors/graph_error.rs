//! Errors raised by the underlying documentation graph.

use super::error_code::{self, PublishedErrorCode};

/// Failures of the graph being traversed. The filtering layer never
/// interprets these; they travel to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Unknown node id {id}")]
    UnknownNode { id: u32 },

    #[error("Node {id} is a {found}, expected a {expected}")]
    KindMismatch {
        id: u32,
        expected: &'static str,
        found: String,
    },

    #[error("Graph source failure: {0}")]
    Source(String),
}

impl PublishedErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        error_code::GRAPH_ERROR
    }
}
