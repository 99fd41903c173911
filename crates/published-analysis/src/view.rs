//! Read-through filtered view of a documentation graph.
//!
//! A `FilteredNode` answers every query its inner node answers, but each
//! node-shaped answer goes back through the inclusion policy first:
//!
//! - excluded packages, types and members disappear from collections;
//! - excluded references stay, neutralized (no target, no inline tags);
//! - any other excluded unit stays with `is_included()` forced false;
//! - untyped sequences come back as collections typed by
//!   `Query::element_kind`, and a mismatched shape is an error.
//!
//! Nothing is cached and the graph is never touched; wrappers can be created
//! and dropped freely. The view is itself a `DocNode`, so views stack.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use published_core::errors::QueryError;

use crate::model::{Answer, Collection, DocNode, ElementKind, Marker, NodeId, NodeKind, Query};
use crate::policy::InclusionPolicy;

/// How the top-level verdict of a wrapped node is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Policy disabled here: report the producer's own flag.
    Underlying,
    /// Forced excluded.
    Excluded,
    /// Ask the policy.
    Evaluate,
}

/// Whether a reference still resolves through the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Live,
    Neutralized,
}

/// Inner node plus the state every variant carries.
#[derive(Debug, Clone)]
pub struct Wrapped<'p, N> {
    inner: N,
    policy: &'p InclusionPolicy,
    forced_excluded: bool,
}

/// A node seen through a `FilteringView`, one variant per node kind.
#[derive(Debug, Clone)]
pub enum FilteredNode<'p, N> {
    Root(Wrapped<'p, N>),
    Package(Wrapped<'p, N>),
    Type(Wrapped<'p, N>),
    Member(Wrapped<'p, N>),
    Reference(Wrapped<'p, N>, Link),
    Generic(Wrapped<'p, N>),
}

/// Factory for filtered nodes under one policy.
#[derive(Debug, Clone, Copy)]
pub struct FilteringView<'p> {
    policy: &'p InclusionPolicy,
}

impl<'p> FilteringView<'p> {
    pub fn new(policy: &'p InclusionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &'p InclusionPolicy {
        self.policy
    }

    pub fn wrap<N: DocNode>(&self, node: N, verdict: Verdict) -> Result<FilteredNode<'p, N>, QueryError> {
        let forced_excluded = match verdict {
            Verdict::Underlying => false,
            Verdict::Excluded => true,
            Verdict::Evaluate => !self.policy.included(&node)?,
        };
        Ok(self.assemble(node, forced_excluded))
    }

    /// The graph root with the policy disabled at the top; its children are
    /// filtered.
    pub fn wrap_root<N: DocNode>(&self, root: N) -> FilteredNode<'p, N> {
        self.assemble(root, false)
    }

    fn assemble<N: DocNode>(&self, inner: N, forced_excluded: bool) -> FilteredNode<'p, N> {
        let kind = inner.kind();
        let wrapped = Wrapped {
            inner,
            policy: self.policy,
            forced_excluded,
        };
        match kind {
            NodeKind::Root => FilteredNode::Root(wrapped),
            NodeKind::Package => FilteredNode::Package(wrapped),
            NodeKind::Type(_) => FilteredNode::Type(wrapped),
            NodeKind::Member(_) => FilteredNode::Member(wrapped),
            NodeKind::Reference if forced_excluded => FilteredNode::Reference(wrapped, Link::Neutralized),
            NodeKind::Reference => FilteredNode::Reference(wrapped, Link::Live),
            NodeKind::Text => FilteredNode::Generic(wrapped),
        }
    }

    /// Filter an inner answer to `query`.
    pub fn filter<N: DocNode>(
        &self,
        query: Query,
        answer: Answer<N>,
    ) -> Result<Answer<FilteredNode<'p, N>>, QueryError> {
        match (query.element_kind(), answer) {
            (_, Answer::Absent) => Ok(Answer::Absent),
            (None, Answer::Node(node)) => Ok(Answer::Node(self.wrap(node, Verdict::Evaluate)?)),
            (None, other) => Err(unsupported(
                query,
                format!("single-valued query answered with a {}", other.shape()),
            )),
            (Some(kind), Answer::Node(_)) => Err(unsupported(
                query,
                format!("expected a collection of {}, got a single node", kind.as_str()),
            )),
            (Some(kind), Answer::Sequence(items)) => {
                Ok(Answer::Collection(self.filter_elements(query, kind, items)?))
            }
            (Some(kind), Answer::Collection(collection)) => {
                if collection.kind != kind {
                    return Err(unsupported(
                        query,
                        format!(
                            "expected a collection of {}, got a collection of {}",
                            kind.as_str(),
                            collection.kind.as_str()
                        ),
                    ));
                }
                Ok(Answer::Collection(self.filter_elements(query, kind, collection.items)?))
            }
        }
    }

    fn filter_elements<N: DocNode>(
        &self,
        query: Query,
        kind: ElementKind,
        items: Vec<N>,
    ) -> Result<Collection<FilteredNode<'p, N>>, QueryError> {
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            let item_kind = item.kind();
            if !kind.admits(item_kind) {
                return Err(unsupported(
                    query,
                    format!("{} element in a collection of {}", item_kind, kind.as_str()),
                ));
            }
            let included = self.policy.included(&item)?;
            match item_kind {
                NodeKind::Package | NodeKind::Type(_) | NodeKind::Member(_) => {
                    if included {
                        kept.push(self.assemble(item, false));
                    } else {
                        tracing::trace!(node = item.qualified_name(), query = query.name(), "dropped");
                    }
                }
                NodeKind::Reference | NodeKind::Root | NodeKind::Text => {
                    kept.push(self.assemble(item, !included));
                }
            }
        }
        Ok(Collection { kind, items: kept })
    }
}

fn unsupported(query: Query, detail: String) -> QueryError {
    QueryError::UnsupportedQueryShape {
        query: query.name(),
        detail,
    }
}

impl<'p, N> FilteredNode<'p, N> {
    fn wrapped(&self) -> &Wrapped<'p, N> {
        match self {
            Self::Root(w)
            | Self::Package(w)
            | Self::Type(w)
            | Self::Member(w)
            | Self::Reference(w, _)
            | Self::Generic(w) => w,
        }
    }

    pub fn inner(&self) -> &N {
        &self.wrapped().inner
    }

    pub fn into_inner(self) -> N {
        match self {
            Self::Root(w)
            | Self::Package(w)
            | Self::Type(w)
            | Self::Member(w)
            | Self::Reference(w, _)
            | Self::Generic(w) => w.inner,
        }
    }

    pub fn is_forced_excluded(&self) -> bool {
        self.wrapped().forced_excluded
    }

    pub fn is_neutralized(&self) -> bool {
        matches!(self, Self::Reference(_, Link::Neutralized))
    }

    /// Fixed answers of a neutralized reference.
    fn neutralized_answer(&self, query: Query) -> Option<Answer<Self>> {
        if !self.is_neutralized() {
            return None;
        }
        match query {
            Query::ReferencedMember | Query::ReferencedClass | Query::ReferencedPackage => {
                Some(Answer::Absent)
            }
            Query::InlineTags | Query::FirstSentenceTags => {
                Some(Answer::Collection(Collection::empty(ElementKind::Tag)))
            }
            _ => None,
        }
    }
}

impl<'p, N: DocNode> DocNode for FilteredNode<'p, N> {
    fn id(&self) -> NodeId {
        self.inner().id()
    }

    fn kind(&self) -> NodeKind {
        self.inner().kind()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn qualified_name(&self) -> &str {
        self.inner().qualified_name()
    }

    fn markers(&self) -> &[Marker] {
        self.inner().markers()
    }

    fn comment_text(&self) -> &str {
        self.inner().comment_text()
    }

    fn signature(&self) -> Option<&str> {
        self.inner().signature()
    }

    fn label(&self) -> Option<&str> {
        self.inner().label()
    }

    fn is_included(&self) -> bool {
        !self.is_forced_excluded() && self.inner().is_included()
    }

    fn is_subtype_of(&self, other: &Self) -> Result<bool, QueryError> {
        self.inner().is_subtype_of(other.inner())
    }

    fn overrides(&self, other: &Self) -> Result<bool, QueryError> {
        self.inner().overrides(other.inner())
    }

    fn query(&self, query: Query) -> Result<Answer<Self>, QueryError> {
        if let Some(answer) = self.neutralized_answer(query) {
            return Ok(answer);
        }
        let wrapped = self.wrapped();
        let answer = wrapped.inner.query(query)?;
        FilteringView::new(wrapped.policy).filter(query, answer)
    }
}

impl<N: DocNode> PartialEq for FilteredNode<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        self.inner() == other.inner()
    }
}

impl<N: DocNode> Eq for FilteredNode<'_, N> {}

impl<N: DocNode> Hash for FilteredNode<'_, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner().hash(state);
    }
}

impl<N: DocNode> PartialOrd for FilteredNode<'_, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: DocNode> Ord for FilteredNode<'_, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner().cmp(other.inner())
    }
}
