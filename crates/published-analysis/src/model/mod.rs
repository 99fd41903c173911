//! Documentation graph model: an immutable arena plus the query surface
//! every consumer, raw or filtered, goes through.

pub mod builder;
pub mod graph;
pub mod node;
pub mod query;
pub mod raw;
pub mod types;

pub use builder::{format_signature, GraphBuilder, MemberSpec, TypeSpec};
pub use graph::DocGraph;
pub use node::DocNode;
pub use query::{Answer, Collection, ElementKind, Query};
pub use raw::RawNode;
pub use types::{
    Comment, Element, Marker, MemberKind, NodeId, NodeKind, Param, ReferenceTarget, TagSlot,
    TypeKind, TypeRef,
};
