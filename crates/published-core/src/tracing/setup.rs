//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, ENV_LOG};

static INIT: Once = Once::new();

/// Initialize the tracing/logging system.
///
/// Reads the `PUBLISHED_LOG` environment variable for per-subsystem levels.
/// Format: `PUBLISHED_LOG=published_analysis::view=debug,published_core=warn`
///
/// Falls back to `info` for the workspace crates if `PUBLISHED_LOG` is not
/// set or is invalid. Logs go to stderr. Repeated calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
