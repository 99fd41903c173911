//! # published-core
//!
//! Shared foundation for the published API whitelist extractor.
//! Errors and error codes, layered configuration, tracing setup, constants,
//! and the collection aliases the analysis crate builds on.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
