//! Graph loading errors (Java sources and JSON snapshots).

use std::path::PathBuf;

use super::error_code::{self, PublishedErrorCode};
use super::GraphError;

/// Errors that can occur while building the documentation graph.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Java grammar unavailable: {message}")]
    GrammarUnavailable { message: String },

    #[error("I/O error reading {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Source walk failed under {root}: {message}")]
    Walk { root: PathBuf, message: String },

    #[error("Tree-sitter could not parse {path}")]
    ParseFailed { path: PathBuf },

    #[error("{count} syntax error(s) in {path}, first at line {line}")]
    Syntax { path: PathBuf, count: u32, line: u32 },

    #[error("Invalid snapshot {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// A marker `tag` value that is not a string constant expression.
    #[error("Unresolvable tag value `{value}` on {holder}")]
    TagValue { holder: String, value: String },

    #[error("No Java sources found under the configured roots")]
    NoSources,

    #[error("Graph assembly failed: {0}")]
    Graph(#[from] GraphError),
}

impl PublishedErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => error_code::SYNTAX_ERROR,
            Self::Snapshot { .. } => error_code::SNAPSHOT_ERROR,
            Self::TagValue { .. } => error_code::TAG_VALUE_ERROR,
            Self::Graph(e) => e.error_code(),
            _ => error_code::LOAD_ERROR,
        }
    }
}
