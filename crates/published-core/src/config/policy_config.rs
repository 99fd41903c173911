//! Inclusion policy configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MARKER;

/// Configuration for the inclusion policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Simple name of the marker annotation. Default: "Published".
    pub marker: Option<String>,
    /// Accepted scope tags. Empty means only tagless markers qualify.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PolicyConfig {
    /// Returns the effective marker name, defaulting to `Published`.
    pub fn effective_marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_MARKER)
    }
}
