//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AccessLevel, OutputConfig, PolicyConfig, SourceConfig};
use crate::constants::{ENV_ACCESS, ENV_MARKER, ENV_OUTPUT, ENV_TAGS, PROJECT_CONFIG_FILE};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`PUBLISHED_*`)
/// 3. Project config (`published.toml` in the project root, or an explicit file)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PublishedConfig {
    pub policy: PolicyConfig,
    pub sources: SourceConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub tags: Option<Vec<String>>,
    pub output: Option<PathBuf>,
    pub marker: Option<String>,
    pub access: Option<AccessLevel>,
    pub source_roots: Vec<PathBuf>,
    pub snapshot: Option<PathBuf>,
}

impl PublishedConfig {
    /// Load configuration with layered resolution.
    ///
    /// `config_file` replaces the default `published.toml` lookup; unlike the
    /// default file, an explicit file that does not exist is an error.
    pub fn load(
        root: &Path,
        config_file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config
        match config_file {
            Some(path) => Self::merge_toml_file(&mut config, path)?,
            None => {
                let project_config_path = root.join(PROJECT_CONFIG_FILE);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        tracing::debug!(
            marker = config.policy.effective_marker(),
            tags = ?config.policy.tags,
            output = ?config.output.path,
            "configuration resolved"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    ///
    /// The output path is checked separately by `OutputConfig::require_path`
    /// because graph dumps run without one.
    pub fn validate(config: &PublishedConfig) -> Result<(), ConfigError> {
        if config.policy.effective_marker().trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "policy.marker".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if config.policy.effective_marker().contains(char::is_whitespace) {
            return Err(ConfigError::ValidationFailed {
                field: "policy.marker".to_string(),
                message: "must be a simple annotation name".to_string(),
            });
        }
        if config.policy.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                field: "policy.tags".to_string(),
                message: "tags must not be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut PublishedConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PublishedConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a value.
    fn merge(base: &mut PublishedConfig, other: &PublishedConfig) {
        // Policy
        if other.policy.marker.is_some() {
            base.policy.marker = other.policy.marker.clone();
        }
        if !other.policy.tags.is_empty() {
            base.policy.tags = other.policy.tags.clone();
        }

        // Sources
        if !other.sources.roots.is_empty() {
            base.sources.roots = other.sources.roots.clone();
        }
        if !other.sources.exclude.is_empty() {
            base.sources.exclude = other.sources.exclude.clone();
        }
        if other.sources.snapshot.is_some() {
            base.sources.snapshot = other.sources.snapshot.clone();
        }
        if other.sources.access.is_some() {
            base.sources.access = other.sources.access;
        }

        // Output
        if other.output.path.is_some() {
            base.output.path = other.output.path.clone();
        }
        if other.output.line_ending.is_some() {
            base.output.line_ending = other.output.line_ending;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PUBLISHED_TAGS=architect,senior-developer`, `PUBLISHED_OUTPUT=openApi.config`.
    fn apply_env_overrides(config: &mut PublishedConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var(ENV_TAGS) {
            config.policy.tags = split_tags(&val);
        }
        if let Ok(val) = std::env::var(ENV_OUTPUT) {
            if !val.trim().is_empty() {
                config.output.path = Some(PathBuf::from(val));
            }
        }
        if let Ok(val) = std::env::var(ENV_MARKER) {
            config.policy.marker = Some(val);
        }
        if let Ok(val) = std::env::var(ENV_ACCESS) {
            let level = AccessLevel::parse(&val).ok_or_else(|| ConfigError::InvalidValue {
                field: ENV_ACCESS.to_string(),
                message: format!("unknown access level '{val}'"),
            })?;
            config.sources.access = Some(level);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut PublishedConfig, cli: &CliOverrides) {
        if let Some(ref tags) = cli.tags {
            config.policy.tags = tags.clone();
        }
        if let Some(ref output) = cli.output {
            config.output.path = Some(output.clone());
        }
        if let Some(ref marker) = cli.marker {
            config.policy.marker = Some(marker.clone());
        }
        if let Some(access) = cli.access {
            config.sources.access = Some(access);
        }
        if !cli.source_roots.is_empty() {
            config.sources.roots = cli.source_roots.clone();
        }
        if let Some(ref snapshot) = cli.snapshot {
            config.sources.snapshot = Some(snapshot.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Split a comma-separated tag list, trimming entries and dropping empty ones.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
