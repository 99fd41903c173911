//! Error handling for the whitelist extractor.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod emit_error;
pub mod error_code;
pub mod graph_error;
pub mod load_error;
pub mod pipeline_error;
pub mod query_error;

pub use config_error::ConfigError;
pub use emit_error::EmitError;
pub use error_code::PublishedErrorCode;
pub use graph_error::GraphError;
pub use load_error::LoadError;
pub use pipeline_error::PipelineError;
pub use query_error::QueryError;
