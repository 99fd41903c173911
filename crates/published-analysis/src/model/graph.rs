//! Immutable documentation graph arena.

use published_core::errors::GraphError;
use serde::{Deserialize, Serialize};

use super::raw::RawNode;
use super::types::{Element, MemberData, NodeId, TypeData};

/// Arena of documentation elements. Element 0 is the root.
///
/// Never mutated after construction; every view over it borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocGraph {
    elements: Vec<Element>,
}

impl DocGraph {
    pub(crate) fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: NodeId) -> Result<&Element, GraphError> {
        self.elements
            .get(id.index())
            .ok_or(GraphError::UnknownNode { id: id.0 })
    }

    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeId(i as u32), e))
    }

    pub fn type_data(&self, id: NodeId) -> Result<&TypeData, GraphError> {
        match self.element(id)? {
            Element::Type(t) => Ok(t),
            other => Err(GraphError::KindMismatch {
                id: id.0,
                expected: "type",
                found: other.kind().to_string(),
            }),
        }
    }

    pub fn member_data(&self, id: NodeId) -> Result<&MemberData, GraphError> {
        match self.element(id)? {
            Element::Member(m) => Ok(m),
            other => Err(GraphError::KindMismatch {
                id: id.0,
                expected: "member",
                found: other.kind().to_string(),
            }),
        }
    }

    pub fn node(&self, id: NodeId) -> Result<RawNode<'_>, GraphError> {
        let element = self.element(id)?;
        Ok(RawNode::new(self, id, element))
    }

    pub fn root(&self) -> Result<RawNode<'_>, GraphError> {
        self.node(NodeId::ROOT)
    }

    /// Number of type elements.
    pub fn type_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Type(_)))
            .count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot. Only the root slot is checked here; dangling ids
    /// surface as `GraphError::UnknownNode` when a query reaches them.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: DocGraph =
            serde_json::from_str(json).map_err(|e| GraphError::Source(e.to_string()))?;
        match graph.elements.first() {
            Some(Element::Root(_)) => Ok(graph),
            Some(other) => Err(GraphError::KindMismatch {
                id: 0,
                expected: "root",
                found: other.kind().to_string(),
            }),
            None => Err(GraphError::UnknownNode { id: 0 }),
        }
    }
}
