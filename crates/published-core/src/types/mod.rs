//! Collection aliases shared across the workspace.

pub mod collections;

pub use collections::{FxHashMap, FxHashSet, SmallVec, TagList};
