//! Whitelist output configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Line separator written between whitelist entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Configuration for the whitelist artifact.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination file. Required for a whitelist run.
    pub path: Option<PathBuf>,
    /// Line separator. Default: lf.
    pub line_ending: Option<LineEnding>,
}

impl OutputConfig {
    /// Returns the output path, or `ConfigError::MissingOutput` when it is
    /// absent or blank.
    pub fn require_path(&self) -> Result<&Path, ConfigError> {
        match self.path.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => Ok(path),
            _ => Err(ConfigError::MissingOutput),
        }
    }

    pub fn effective_line_ending(&self) -> LineEnding {
        self.line_ending.unwrap_or_default()
    }
}
