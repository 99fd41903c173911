//! `DocNode` over the graph arena itself, with no filtering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use published_core::errors::{GraphError, QueryError};
use published_core::types::collections::FxHashSet;

use super::graph::DocGraph;
use super::node::DocNode;
use super::query::{Answer, Query};
use super::types::{Comment, Element, Marker, MemberKind, NodeId, NodeKind, TypeData, TypeKind};

/// A node of a `DocGraph`. Cheap to copy; identity is the node id.
#[derive(Clone, Copy)]
pub struct RawNode<'g> {
    graph: &'g DocGraph,
    id: NodeId,
    element: &'g Element,
}

impl<'g> RawNode<'g> {
    pub(crate) fn new(graph: &'g DocGraph, id: NodeId, element: &'g Element) -> Self {
        Self { graph, id, element }
    }

    pub fn element(&self) -> &'g Element {
        self.element
    }

    pub fn graph(&self) -> &'g DocGraph {
        self.graph
    }

    fn nodes_of(&self, ids: &[NodeId]) -> Result<Vec<RawNode<'g>>, GraphError> {
        ids.iter().map(|&id| self.graph.node(id)).collect()
    }

    fn types_where(
        &self,
        ids: &[NodeId],
        keep: impl Fn(TypeKind) -> bool,
    ) -> Result<Vec<RawNode<'g>>, GraphError> {
        let mut out = Vec::new();
        for &id in ids {
            let node = self.graph.node(id)?;
            if let NodeKind::Type(kind) = node.kind() {
                if keep(kind) {
                    out.push(node);
                }
            }
        }
        Ok(out)
    }

    fn single(&self, id: Option<NodeId>) -> Result<Answer<RawNode<'g>>, GraphError> {
        match id {
            Some(id) => Ok(Answer::Node(self.graph.node(id)?)),
            None => Ok(Answer::Absent),
        }
    }

    fn comment_tags(&self, comment: &Comment, query: Query) -> Result<Vec<RawNode<'g>>, GraphError> {
        match query {
            Query::InlineTags => self.nodes_of(&comment.inline),
            Query::FirstSentenceTags => self.nodes_of(&comment.first_sentence),
            Query::Tags => self.nodes_of(&comment.block),
            Query::SeeTags => {
                let mut out = Vec::new();
                for node in self.nodes_of(&comment.block)? {
                    if let Element::Reference(r) = node.element {
                        if r.tag == "@see" {
                            out.push(node);
                        }
                    }
                }
                Ok(out)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn type_answer(&self, data: &'g TypeData, query: Query) -> Result<Answer<RawNode<'g>>, GraphError> {
        let items = match query {
            Query::Methods => self.nodes_of(&data.methods)?,
            Query::Fields => self.nodes_of(&data.fields)?,
            Query::EnumConstants => self.nodes_of(&data.enum_constants)?,
            Query::Constructors => self.nodes_of(&data.constructors)?,
            Query::InnerClasses => self.nodes_of(&data.nested)?,
            Query::Superclass => {
                return self.single(data.superclass.as_ref().and_then(|s| s.node));
            }
            Query::ContainingPackage => return self.single(Some(data.package)),
            Query::ContainingClass => return self.single(data.enclosing),
            q if q.is_collection() => self.comment_tags(&data.comment, q)?,
            _ => return Ok(Answer::Absent),
        };
        Ok(Answer::Sequence(items))
    }

    /// Supertypes reachable from `id`, `id` included.
    fn supertypes(&self, id: NodeId) -> Result<FxHashSet<NodeId>, GraphError> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let data = self.graph.type_data(current)?;
            stack.extend(data.superclass.iter().filter_map(|s| s.node));
            stack.extend(data.interfaces.iter().filter_map(|i| i.node));
        }
        Ok(seen)
    }
}

impl<'g> DocNode for RawNode<'g> {
    fn id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        self.element.kind()
    }

    fn name(&self) -> &str {
        match self.element {
            Element::Root(_) => "",
            Element::Package(p) => &p.name,
            Element::Type(t) => &t.name,
            Element::Member(m) => &m.name,
            Element::Reference(r) => &r.tag,
            Element::Text(t) => &t.tag,
        }
    }

    fn qualified_name(&self) -> &str {
        match self.element {
            Element::Root(_) => "",
            Element::Package(p) => &p.name,
            Element::Type(t) => &t.qualified_name,
            Element::Member(m) => &m.qualified_name,
            Element::Reference(r) => &r.text,
            Element::Text(t) => &t.text,
        }
    }

    fn markers(&self) -> &[Marker] {
        match self.element {
            Element::Type(t) => &t.markers,
            Element::Member(m) => &m.markers,
            _ => &[],
        }
    }

    fn comment_text(&self) -> &str {
        match self.element {
            Element::Root(_) => "",
            Element::Package(p) => &p.comment.text,
            Element::Type(t) => &t.comment.text,
            Element::Member(m) => &m.comment.text,
            Element::Reference(r) => &r.text,
            Element::Text(t) => &t.text,
        }
    }

    fn signature(&self) -> Option<&str> {
        match self.element {
            Element::Member(m) => m.signature.as_deref(),
            _ => None,
        }
    }

    fn label(&self) -> Option<&str> {
        match self.element {
            Element::Reference(r) => Some(&r.label),
            _ => None,
        }
    }

    fn is_included(&self) -> bool {
        match self.element {
            Element::Package(p) => p.documented,
            Element::Type(t) => t.documented,
            Element::Member(m) => m.documented,
            Element::Root(_) | Element::Reference(_) | Element::Text(_) => true,
        }
    }

    fn is_subtype_of(&self, other: &Self) -> Result<bool, QueryError> {
        if !matches!(self.kind(), NodeKind::Type(_)) || !matches!(other.kind(), NodeKind::Type(_)) {
            return Ok(false);
        }
        Ok(self.supertypes(self.id)?.contains(&other.id))
    }

    fn overrides(&self, other: &Self) -> Result<bool, QueryError> {
        let method = NodeKind::Member(MemberKind::Method);
        if self.kind() != method || other.kind() != method || self.id == other.id {
            return Ok(false);
        }
        let (mine, theirs) = match (self.element, other.element) {
            (Element::Member(a), Element::Member(b)) => (a, b),
            _ => return Ok(false),
        };
        if mine.name != theirs.name || mine.signature != theirs.signature {
            return Ok(false);
        }
        if mine.enclosing == theirs.enclosing {
            return Ok(false);
        }
        Ok(self.supertypes(mine.enclosing)?.contains(&theirs.enclosing))
    }

    fn query(&self, query: Query) -> Result<Answer<Self>, QueryError> {
        let answer = match self.element {
            Element::Root(root) => match query {
                Query::Packages => Answer::Sequence(self.nodes_of(&root.packages)?),
                Query::Classes | Query::AllClasses => Answer::Sequence(self.nodes_of(&root.types)?),
                Query::OrdinaryClasses => {
                    Answer::Sequence(self.types_where(&root.types, |k| k.is_ordinary_class())?)
                }
                Query::Interfaces => {
                    Answer::Sequence(self.types_where(&root.types, |k| k == TypeKind::Interface)?)
                }
                Query::Enums => Answer::Sequence(self.types_where(&root.types, |k| k == TypeKind::Enum)?),
                Query::Exceptions => {
                    Answer::Sequence(self.types_where(&root.types, |k| k == TypeKind::Exception)?)
                }
                Query::Errors => Answer::Sequence(self.types_where(&root.types, |k| k == TypeKind::Error)?),
                Query::AnnotationTypes => Answer::Sequence(
                    self.types_where(&root.types, |k| k == TypeKind::AnnotationType)?,
                ),
                q if q.is_collection() => Answer::Sequence(Vec::new()),
                _ => Answer::Absent,
            },
            Element::Package(pkg) => match query {
                Query::Classes | Query::AllClasses => Answer::Sequence(self.nodes_of(&pkg.types)?),
                Query::OrdinaryClasses => {
                    Answer::Sequence(self.types_where(&pkg.types, |k| k.is_ordinary_class())?)
                }
                Query::Interfaces => {
                    Answer::Sequence(self.types_where(&pkg.types, |k| k == TypeKind::Interface)?)
                }
                Query::Enums => Answer::Sequence(self.types_where(&pkg.types, |k| k == TypeKind::Enum)?),
                Query::Exceptions => {
                    Answer::Sequence(self.types_where(&pkg.types, |k| k == TypeKind::Exception)?)
                }
                Query::Errors => Answer::Sequence(self.types_where(&pkg.types, |k| k == TypeKind::Error)?),
                Query::AnnotationTypes => Answer::Sequence(
                    self.types_where(&pkg.types, |k| k == TypeKind::AnnotationType)?,
                ),
                q if q.is_collection() => Answer::Sequence(self.comment_tags(&pkg.comment, q)?),
                _ => Answer::Absent,
            },
            Element::Type(data) => self.type_answer(data, query)?,
            Element::Member(member) => match query {
                Query::ContainingClass => self.single(Some(member.enclosing))?,
                Query::ContainingPackage => {
                    let owner = self.graph.type_data(member.enclosing)?;
                    self.single(Some(owner.package))?
                }
                q if q.is_collection() => Answer::Sequence(self.comment_tags(&member.comment, q)?),
                _ => Answer::Absent,
            },
            Element::Reference(reference) => match query {
                Query::ReferencedMember => self.single(reference.target.member)?,
                Query::ReferencedClass => self.single(reference.target.class)?,
                Query::ReferencedPackage => self.single(reference.target.package)?,
                Query::Holder => self.single(Some(reference.holder))?,
                Query::InlineTags | Query::FirstSentenceTags => {
                    Answer::Sequence(self.nodes_of(&reference.inline)?)
                }
                q if q.is_collection() => Answer::Sequence(Vec::new()),
                _ => Answer::Absent,
            },
            Element::Text(text) => match query {
                Query::Holder => self.single(Some(text.holder))?,
                q if q.is_collection() => Answer::Sequence(Vec::new()),
                _ => Answer::Absent,
            },
        };
        Ok(answer)
    }
}

impl PartialEq for RawNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RawNode<'_> {}

impl Hash for RawNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for RawNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RawNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.qualified_name()
            .cmp(other.qualified_name())
            .then(self.id.cmp(&other.id))
    }
}

impl fmt::Debug for RawNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawNode")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.qualified_name())
            .finish()
    }
}
