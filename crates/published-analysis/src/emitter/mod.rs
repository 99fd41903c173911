//! Whitelist emission over a (filtered) documentation graph.

pub mod signature;
pub mod whitelist;

pub use signature::normalize_signature;
pub use whitelist::{Whitelist, WhitelistEmitter};
