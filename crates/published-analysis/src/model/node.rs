//! The query interface shared by raw graph nodes and filtered nodes.

use std::fmt::Debug;
use std::hash::Hash;

use published_core::errors::QueryError;

use super::query::{Answer, Query};
use super::types::{Marker, NodeId, NodeKind};

/// A node of a documentation graph, seen through some query surface.
///
/// Equality, hashing and ordering are defined on the underlying node, never
/// on wrapper identity. Ordering is by qualified name, then id.
pub trait DocNode: Clone + Eq + Ord + Hash + Debug + Sized {
    fn id(&self) -> NodeId;

    fn kind(&self) -> NodeKind;

    /// Simple name; tag name (`@see`, `Text`, ...) for tags.
    fn name(&self) -> &str;

    fn qualified_name(&self) -> &str;

    fn markers(&self) -> &[Marker];

    /// Raw comment text for holders, body text for tags.
    fn comment_text(&self) -> &str;

    /// Parenthesized parameter type list for methods and constructors.
    fn signature(&self) -> Option<&str>;

    /// Display label of a reference.
    fn label(&self) -> Option<&str>;

    /// The producer's own "is this documented" flag, possibly forced false by
    /// a view.
    fn is_included(&self) -> bool;

    /// Reflexive subtype check over superclasses and interfaces.
    fn is_subtype_of(&self, other: &Self) -> Result<bool, QueryError>;

    /// Whether this method overrides `other`.
    fn overrides(&self, other: &Self) -> Result<bool, QueryError>;

    fn query(&self, query: Query) -> Result<Answer<Self>, QueryError>;

    /// Elements of a collection query. `Absent` reads as empty.
    fn nodes(&self, query: Query) -> Result<Vec<Self>, QueryError> {
        match self.query(query)? {
            Answer::Absent => Ok(Vec::new()),
            Answer::Sequence(items) => Ok(items),
            Answer::Collection(collection) => Ok(collection.items),
            Answer::Node(_) => Err(QueryError::UnsupportedQueryShape {
                query: query.name(),
                detail: "expected a collection, got a single node".to_string(),
            }),
        }
    }

    /// Target of a single-valued query.
    fn node(&self, query: Query) -> Result<Option<Self>, QueryError> {
        match self.query(query)? {
            Answer::Absent => Ok(None),
            Answer::Node(node) => Ok(Some(node)),
            other => Err(QueryError::UnsupportedQueryShape {
                query: query.name(),
                detail: format!("expected a single node, got a {}", other.shape()),
            }),
        }
    }
}
