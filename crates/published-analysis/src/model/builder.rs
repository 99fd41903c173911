//! Incremental construction of a `DocGraph`.

use published_core::errors::GraphError;
use published_core::types::collections::FxHashMap;

use super::graph::DocGraph;
use super::types::{
    Comment, Element, Marker, MemberData, MemberKind, NodeId, PackageData, Param, ReferenceData,
    ReferenceTarget, RootData, TagSlot, TextData, TypeData, TypeKind, TypeRef,
};

/// Declaration of a type to add.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    pub kind: TypeKind,
    pub package: String,
    pub enclosing: Option<NodeId>,
    pub type_params: Vec<String>,
    pub markers: Vec<Marker>,
    pub comment: String,
}

impl TypeSpec {
    pub fn new(package: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            package: package.into(),
            enclosing: None,
            type_params: Vec::new(),
            markers: Vec::new(),
            comment: String::new(),
        }
    }

    pub fn class(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(package, name, TypeKind::Class)
    }

    pub fn nested_in(mut self, enclosing: NodeId) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = text.into();
        self
    }

    pub fn type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }
}

/// Declaration of a member to add.
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub name: String,
    pub kind: MemberKind,
    pub params: Vec<Param>,
    pub markers: Vec<Marker>,
    pub comment: String,
    pub synthesized: bool,
    pub enum_constant: bool,
}

impl MemberSpec {
    fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
            markers: Vec::new(),
            comment: String::new(),
            synthesized: false,
            enum_constant: false,
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Method)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Field)
    }

    /// Named after the owning type when added.
    pub fn constructor() -> Self {
        Self::new(String::new(), MemberKind::Constructor)
    }

    pub fn enum_constant(name: impl Into<String>) -> Self {
        let mut spec = Self::new(name, MemberKind::Field);
        spec.enum_constant = true;
        spec
    }

    pub fn param(mut self, type_name: impl Into<String>, name: impl Into<String>) -> Self {
        self.params.push(Param::new(type_name, name));
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = text.into();
        self
    }

    pub fn synthesized(mut self) -> Self {
        self.synthesized = true;
        self
    }
}

/// Builds the arena. Root at id 0; packages created on first use.
#[derive(Debug)]
pub struct GraphBuilder {
    elements: Vec<Element>,
    packages: FxHashMap<String, NodeId>,
    types: FxHashMap<String, NodeId>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::Root(RootData::default())],
            packages: FxHashMap::default(),
            types: FxHashMap::default(),
        }
    }

    fn push(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    fn root_mut(&mut self) -> &mut RootData {
        match &mut self.elements[0] {
            Element::Root(root) => root,
            _ => unreachable!("element 0 is always the root"),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, GraphError> {
        self.elements
            .get_mut(id.index())
            .ok_or(GraphError::UnknownNode { id: id.0 })
    }

    fn type_mut(&mut self, id: NodeId) -> Result<&mut TypeData, GraphError> {
        match self.element_mut(id)? {
            Element::Type(t) => Ok(t),
            other => Err(GraphError::KindMismatch {
                id: id.0,
                expected: "type",
                found: other.kind().to_string(),
            }),
        }
    }

    pub fn element(&self, id: NodeId) -> Result<&Element, GraphError> {
        self.elements
            .get(id.index())
            .ok_or(GraphError::UnknownNode { id: id.0 })
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

    /// Package node for `name`, created on first request.
    pub fn package(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.packages.get(name) {
            return id;
        }
        let id = self.push(Element::Package(PackageData {
            name: name.to_string(),
            types: Vec::new(),
            comment: Comment::default(),
            documented: true,
        }));
        self.packages.insert(name.to_string(), id);
        self.root_mut().packages.push(id);
        id
    }

    pub fn find_package(&self, name: &str) -> Option<NodeId> {
        self.packages.get(name).copied()
    }

    pub fn find_type(&self, qualified_name: &str) -> Option<NodeId> {
        self.types.get(qualified_name).copied()
    }

    pub fn set_package_comment(&mut self, package: NodeId, text: &str) -> Result<(), GraphError> {
        match self.element_mut(package)? {
            Element::Package(p) => {
                p.comment.text = text.to_string();
                Ok(())
            }
            other => Err(GraphError::KindMismatch {
                id: package.0,
                expected: "package",
                found: other.kind().to_string(),
            }),
        }
    }

    pub fn add_type(&mut self, spec: TypeSpec) -> Result<NodeId, GraphError> {
        let package = self.package(&spec.package);
        let qualified_name = match spec.enclosing {
            Some(outer) => format!("{}.{}", self.type_data(outer)?.qualified_name, spec.name),
            None if spec.package.is_empty() => spec.name.clone(),
            None => format!("{}.{}", spec.package, spec.name),
        };
        let id = self.push(Element::Type(TypeData {
            name: spec.name,
            qualified_name: qualified_name.clone(),
            kind: spec.kind,
            package,
            enclosing: spec.enclosing,
            superclass: None,
            interfaces: Vec::new(),
            type_params: spec.type_params,
            markers: spec.markers,
            comment: Comment {
                text: spec.comment,
                ..Comment::default()
            },
            methods: Vec::new(),
            fields: Vec::new(),
            enum_constants: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
            documented: true,
        }));
        if let Some(outer) = spec.enclosing {
            self.type_mut(outer)?.nested.push(id);
        }
        if let Element::Package(p) = self.element_mut(package)? {
            p.types.push(id);
        }
        self.root_mut().types.push(id);
        self.types.insert(qualified_name, id);
        Ok(id)
    }

    pub fn add_member(&mut self, owner: NodeId, spec: MemberSpec) -> Result<NodeId, GraphError> {
        let owner_data = self.type_data(owner)?;
        let name = match spec.kind {
            MemberKind::Constructor => owner_data.name.clone(),
            _ => spec.name,
        };
        let qualified_name = format!("{}.{}", owner_data.qualified_name, name);
        let signature = match spec.kind {
            MemberKind::Field => None,
            _ => Some(format_signature(&spec.params)),
        };
        let id = self.push(Element::Member(MemberData {
            name,
            qualified_name,
            kind: spec.kind,
            enclosing: owner,
            params: spec.params,
            signature,
            markers: spec.markers,
            comment: Comment {
                text: spec.comment,
                ..Comment::default()
            },
            synthesized: spec.synthesized,
            documented: true,
        }));
        let owner_data = self.type_mut(owner)?;
        match spec.kind {
            MemberKind::Method => owner_data.methods.push(id),
            MemberKind::Constructor => owner_data.constructors.push(id),
            MemberKind::Field if spec.enum_constant => owner_data.enum_constants.push(id),
            MemberKind::Field => owner_data.fields.push(id),
        }
        Ok(id)
    }

    pub fn set_superclass(&mut self, ty: NodeId, superclass: TypeRef) -> Result<(), GraphError> {
        self.type_mut(ty)?.superclass = Some(superclass);
        Ok(())
    }

    pub fn add_interface(&mut self, ty: NodeId, interface: TypeRef) -> Result<(), GraphError> {
        self.type_mut(ty)?.interfaces.push(interface);
        Ok(())
    }

    pub fn set_type_kind(&mut self, ty: NodeId, kind: TypeKind) -> Result<(), GraphError> {
        self.type_mut(ty)?.kind = kind;
        Ok(())
    }

    fn attach(&mut self, holder: NodeId, slot: TagSlot, tag: NodeId) -> Result<(), GraphError> {
        let element = self.element_mut(holder)?;
        let kind = element.kind();
        let comment = element.comment_mut().ok_or_else(|| GraphError::KindMismatch {
            id: holder.0,
            expected: "comment holder",
            found: kind.to_string(),
        })?;
        match slot {
            TagSlot::Inline => comment.inline.push(tag),
            TagSlot::FirstSentence => comment.first_sentence.push(tag),
            TagSlot::Block => comment.block.push(tag),
        }
        Ok(())
    }

    /// Add a text tag (`Text`, `@code`, `@param`, ...) to a holder's comment.
    pub fn add_text(
        &mut self,
        holder: NodeId,
        slot: TagSlot,
        tag: &str,
        text: &str,
    ) -> Result<NodeId, GraphError> {
        self.element(holder)?;
        let id = self.push(Element::Text(TextData {
            tag: tag.to_string(),
            text: text.to_string(),
            holder,
        }));
        self.attach(holder, slot, id)?;
        Ok(id)
    }

    /// Add an unresolved reference tag. A non-empty label becomes a text node
    /// reachable through the reference's inline tags.
    pub fn add_reference(
        &mut self,
        holder: NodeId,
        slot: TagSlot,
        tag: &str,
        text: &str,
        label: &str,
    ) -> Result<NodeId, GraphError> {
        self.element(holder)?;
        let id = self.push(Element::Reference(ReferenceData {
            tag: tag.to_string(),
            text: text.to_string(),
            label: label.to_string(),
            holder,
            target: ReferenceTarget::default(),
            inline: Vec::new(),
        }));
        if !label.is_empty() {
            let label_id = self.push(Element::Text(TextData {
                tag: "Text".to_string(),
                text: label.to_string(),
                holder: id,
            }));
            if let Element::Reference(r) = self.element_mut(id)? {
                r.inline.push(label_id);
            }
        }
        self.attach(holder, slot, id)?;
        Ok(id)
    }

    pub fn set_reference_target(
        &mut self,
        reference: NodeId,
        target: ReferenceTarget,
    ) -> Result<(), GraphError> {
        match self.element_mut(reference)? {
            Element::Reference(r) => {
                r.target = target;
                Ok(())
            }
            other => Err(GraphError::KindMismatch {
                id: reference.0,
                expected: "reference",
                found: other.kind().to_string(),
            }),
        }
    }

    /// Ids of all type elements added so far.
    pub fn type_ids(&self) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Element::Type(_)))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    /// Ids of all reference elements added so far.
    pub fn references(&self) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Element::Reference(_)))
            .map(|(i, _)| NodeId(i as u32))
            .collect()
    }

    pub fn build(self) -> DocGraph {
        DocGraph::from_elements(self.elements)
    }
}

/// `(type, type)` from declared parameters.
pub fn format_signature(params: &[Param]) -> String {
    let types: Vec<&str> = params.iter().map(|p| p.type_name.as_str()).collect();
    format!("({})", types.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocNode, Query};

    #[test]
    fn qualified_names_and_signatures() {
        let mut b = GraphBuilder::new();
        let outer = b.add_type(TypeSpec::class("com.acme", "Outer")).unwrap();
        let inner = b
            .add_type(TypeSpec::class("com.acme", "Inner").nested_in(outer))
            .unwrap();
        let ctor = b.add_member(inner, MemberSpec::constructor().param("int", "x")).unwrap();
        let m = b
            .add_member(
                outer,
                MemberSpec::method("put")
                    .param("java.lang.String", "k")
                    .param("java.util.List<T>", "v"),
            )
            .unwrap();
        let graph = b.build();

        assert_eq!(graph.node(inner).unwrap().qualified_name(), "com.acme.Outer.Inner");
        let ctor = graph.node(ctor).unwrap();
        assert_eq!(ctor.qualified_name(), "com.acme.Outer.Inner.Inner");
        assert_eq!(ctor.signature(), Some("(int)"));
        assert_eq!(
            graph.node(m).unwrap().signature(),
            Some("(java.lang.String, java.util.List<T>)")
        );
    }

    #[test]
    fn nested_types_are_listed_at_root_and_package() {
        let mut b = GraphBuilder::new();
        let outer = b.add_type(TypeSpec::class("p", "A")).unwrap();
        b.add_type(TypeSpec::class("p", "B").nested_in(outer)).unwrap();
        let graph = b.build();
        let root = graph.root().unwrap();

        assert_eq!(root.nodes(Query::Classes).unwrap().len(), 2);
        let pkg = &root.nodes(Query::Packages).unwrap()[0];
        assert_eq!(pkg.nodes(Query::AllClasses).unwrap().len(), 2);
        let a = graph.node(outer).unwrap();
        assert_eq!(a.nodes(Query::InnerClasses).unwrap().len(), 1);
    }

    #[test]
    fn labelled_reference_has_inline_text() {
        let mut b = GraphBuilder::new();
        let ty = b.add_type(TypeSpec::class("p", "A")).unwrap();
        let r = b.add_reference(ty, TagSlot::Block, "@see", "p.B", "the B").unwrap();
        let graph = b.build();
        let r = graph.node(r).unwrap();

        assert_eq!(r.label(), Some("the B"));
        let inline = r.nodes(Query::InlineTags).unwrap();
        assert_eq!(inline.len(), 1);
        assert_eq!(inline[0].comment_text(), "the B");
        assert_eq!(graph.node(ty).unwrap().nodes(Query::SeeTags).unwrap().len(), 1);
    }

    #[test]
    fn member_on_non_type_is_kind_mismatch() {
        let mut b = GraphBuilder::new();
        let pkg = b.package("p");
        let err = b.add_member(pkg, MemberSpec::method("m")).unwrap_err();
        assert!(matches!(err, GraphError::KindMismatch { .. }));
    }
}
