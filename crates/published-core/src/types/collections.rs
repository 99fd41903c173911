//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// Scope tags on a marker (almost always zero, one or two).
pub type TagList = SmallVec<[String; 2]>;
