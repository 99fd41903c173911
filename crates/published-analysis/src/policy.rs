//! Inclusion rules deciding whether a node belongs to the published API.

use published_core::config::PolicyConfig;
use published_core::errors::QueryError;
use published_core::types::collections::FxHashSet;

use crate::model::{DocNode, Marker, MemberKind, NodeKind, Query};

/// Marker name plus the scope tags accepted for this run.
///
/// Pure: decisions depend only on the node, its declared members and
/// markers, and this configuration. Inheritance is never consulted.
#[derive(Debug, Clone)]
pub struct InclusionPolicy {
    marker: String,
    accepted_tags: FxHashSet<String>,
}

impl InclusionPolicy {
    pub fn new<I, S>(marker: impl Into<String>, accepted_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            marker: marker.into(),
            accepted_tags: accepted_tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.effective_marker(), config.tags.iter().cloned())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn accepted_tags(&self) -> &FxHashSet<String> {
        &self.accepted_tags
    }

    /// Tagless, or sharing at least one tag with the accepted set.
    pub fn is_qualifying(&self, marker: &Marker) -> bool {
        marker.simple_name() == self.marker
            && (marker.tags.is_empty() || marker.tags.iter().any(|t| self.accepted_tags.contains(t)))
    }

    pub fn has_qualifying_marker<N: DocNode>(&self, node: &N) -> bool {
        node.markers().iter().any(|m| self.is_qualifying(m))
    }

    /// Whether `node` is part of the published API. Graph failures are
    /// returned unchanged.
    pub fn included<N: DocNode>(&self, node: &N) -> Result<bool, QueryError> {
        match node.kind() {
            NodeKind::Package => self.package_included(node),
            NodeKind::Type(_) => self.type_included(node),
            NodeKind::Member(_) => self.member_included(node),
            NodeKind::Reference => self.reference_included(node),
            NodeKind::Root | NodeKind::Text => Ok(true),
        }
    }

    fn package_included<N: DocNode>(&self, package: &N) -> Result<bool, QueryError> {
        for ty in package.nodes(Query::AllClasses)? {
            if self.type_included(&ty)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn type_included<N: DocNode>(&self, ty: &N) -> Result<bool, QueryError> {
        if self.has_qualifying_marker(ty) {
            return Ok(true);
        }
        for query in [Query::Methods, Query::Fields, Query::Constructors] {
            if ty.nodes(query)?.iter().any(|m| self.has_qualifying_marker(m)) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn member_included<N: DocNode>(&self, member: &N) -> Result<bool, QueryError> {
        if let Some(owner) = member.node(Query::ContainingClass)? {
            if self.has_qualifying_marker(&owner) && !is_implicit_constructor(member) {
                return Ok(true);
            }
        }
        Ok(self.has_qualifying_marker(member))
    }

    /// Member, then class, then package. Unresolved references are excluded.
    fn reference_included<N: DocNode>(&self, reference: &N) -> Result<bool, QueryError> {
        if let Some(member) = reference.node(Query::ReferencedMember)? {
            return self.member_included(&member);
        }
        if let Some(class) = reference.node(Query::ReferencedClass)? {
            return self.type_included(&class);
        }
        if let Some(package) = reference.node(Query::ReferencedPackage)? {
            return self.package_included(&package);
        }
        tracing::trace!(reference = reference.qualified_name(), "unresolved reference excluded");
        Ok(false)
    }
}

/// A constructor with no documentation text, i.e. one the compiler
/// provided.
pub fn is_implicit_constructor<N: DocNode>(node: &N) -> bool {
    node.kind() == NodeKind::Member(MemberKind::Constructor) && node.comment_text().trim().is_empty()
}
