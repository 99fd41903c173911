//! Observability for the whitelist extractor.
//! `tracing` crate with `EnvFilter`, per-subsystem log levels.

pub mod setup;

pub use setup::init_tracing;
