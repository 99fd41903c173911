//! Source discovery configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Minimum declared visibility a declaration needs to enter the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    Package,
    Protected,
    Public,
}

impl AccessLevel {
    /// Parse the lowercase name used in config files and on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "private" => Some(Self::Private),
            "package" => Some(Self::Package),
            "protected" => Some(Self::Protected),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Package => "package",
            Self::Protected => "protected",
            Self::Public => "public",
        }
    }
}

/// Configuration for where the documentation graph comes from.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Java source roots, relative to the project root.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Glob patterns excluded from discovery.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Pre-built graph snapshot (JSON). Takes precedence over `roots`.
    pub snapshot: Option<PathBuf>,
    /// Minimum access level. Default: protected.
    pub access: Option<AccessLevel>,
}

impl SourceConfig {
    /// Returns the effective access level, defaulting to `Protected`.
    pub fn effective_access(&self) -> AccessLevel {
        self.access.unwrap_or(AccessLevel::Protected)
    }

    /// Returns the effective source roots, defaulting to `src/main/java`.
    pub fn effective_roots(&self) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            vec![PathBuf::from(crate::constants::DEFAULT_SOURCE_ROOT)]
        } else {
            self.roots.clone()
        }
    }
}
