//! Shared constants for the whitelist extractor.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simple name of the marker annotation.
pub const DEFAULT_MARKER: &str = "Published";

/// Name of the marker element that carries scope tags.
pub const TAG_ELEMENT: &str = "tag";

/// Placeholder substituted for type variables in normalized signatures.
pub const ERASED_TYPE_PLACEHOLDER: &str = "java.lang.Object";

/// Project configuration file looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "published.toml";

/// Source root used when none is configured.
pub const DEFAULT_SOURCE_ROOT: &str = "src/main/java";

/// Default tracing filter when `PUBLISHED_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "published_core=info,published_analysis=info,published_cli=info";

// ---- Environment variables ----

/// Per-subsystem log levels, `EnvFilter` syntax.
pub const ENV_LOG: &str = "PUBLISHED_LOG";

/// Comma-separated accepted scope tags.
pub const ENV_TAGS: &str = "PUBLISHED_TAGS";

/// Whitelist output path.
pub const ENV_OUTPUT: &str = "PUBLISHED_OUTPUT";

/// Marker annotation name.
pub const ENV_MARKER: &str = "PUBLISHED_MARKER";

/// Minimum access level for loaded declarations.
pub const ENV_ACCESS: &str = "PUBLISHED_ACCESS";
