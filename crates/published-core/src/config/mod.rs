//! Configuration system for the whitelist extractor.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod output_config;
pub mod policy_config;
pub mod published_config;
pub mod source_config;

pub use output_config::{LineEnding, OutputConfig};
pub use policy_config::PolicyConfig;
pub use published_config::{split_tags, CliOverrides, PublishedConfig};
pub use source_config::{AccessLevel, SourceConfig};
