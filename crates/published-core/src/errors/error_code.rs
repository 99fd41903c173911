//! PublishedErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string.
/// The CLI prints errors in the coded form so wrapper scripts can match on
/// the code without parsing the message.
pub trait PublishedErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted coded string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MISSING_OUTPUT: &str = "MISSING_OUTPUT";
pub const GRAPH_ERROR: &str = "GRAPH_ERROR";
pub const UNSUPPORTED_QUERY_SHAPE: &str = "UNSUPPORTED_QUERY_SHAPE";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";
pub const SNAPSHOT_ERROR: &str = "SNAPSHOT_ERROR";
pub const TAG_VALUE_ERROR: &str = "TAG_VALUE_ERROR";
pub const EMIT_ERROR: &str = "EMIT_ERROR";
