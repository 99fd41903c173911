//! Node identity, node kinds, markers, and the per-kind element payloads
//! stored in the graph arena.

use std::fmt;

use published_core::types::collections::TagList;
use serde::{Deserialize, Serialize};

/// Index of a node in the graph arena. The root is always `NodeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type declaration flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    AnnotationType,
    Record,
    /// A class whose superclass chain reaches `java.lang.Exception`.
    Exception,
    /// A class whose superclass chain reaches `java.lang.Error`.
    Error,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::AnnotationType => "annotation type",
            Self::Record => "record",
            Self::Exception => "exception",
            Self::Error => "error",
        }
    }

    /// Classes in the documentation sense: everything that is not an
    /// interface, enum, annotation type, exception or error.
    pub fn is_ordinary_class(&self) -> bool {
        matches!(self, Self::Class | Self::Record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Field,
    Constructor,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Field => "field",
            Self::Constructor => "constructor",
        }
    }
}

/// What a node is. Drives both the inclusion rules and the wrapper variant
/// the filtering view picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Package,
    Type(TypeKind),
    Member(MemberKind),
    /// `@see`, `{@link}` or `{@linkplain}`.
    Reference,
    /// Any other documentation unit: plain text, `{@code}`, `@param`, ...
    Text,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Package => "package",
            Self::Type(t) => t.as_str(),
            Self::Member(m) => m.as_str(),
            Self::Reference => "reference",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared annotation-like marker with its scope tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marker {
    /// Simple (`Published`) or qualified (`com.acme.Published`) name.
    pub name: String,
    #[serde(default)]
    pub tags: TagList,
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: TagList::new(),
        }
    }

    pub fn with_tags<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Name after the last `.`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Comment text plus the tag nodes it was split into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub text: String,
    pub inline: Vec<NodeId>,
    pub first_sentence: Vec<NodeId>,
    pub block: Vec<NodeId>,
}

/// Which part of a holder's comment a tag node is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSlot {
    Inline,
    FirstSentence,
    Block,
}

/// A possibly-resolved type reference (superclass or interface).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub node: Option<NodeId>,
}

impl TypeRef {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub type_name: String,
    pub name: String,
}

impl Param {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

/// Resolved target of a cross-reference. A member target also carries its
/// class, a class target its package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceTarget {
    pub member: Option<NodeId>,
    pub class: Option<NodeId>,
    pub package: Option<NodeId>,
}

impl ReferenceTarget {
    pub fn is_unresolved(&self) -> bool {
        self.member.is_none() && self.class.is_none() && self.package.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootData {
    pub packages: Vec<NodeId>,
    /// Every documented type, nested ones included.
    pub types: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageData {
    pub name: String,
    #[serde(default)]
    pub types: Vec<NodeId>,
    #[serde(default)]
    pub comment: Comment,
    #[serde(default = "default_true")]
    pub documented: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeData {
    pub name: String,
    pub qualified_name: String,
    pub kind: TypeKind,
    pub package: NodeId,
    #[serde(default)]
    pub enclosing: Option<NodeId>,
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub comment: Comment,
    #[serde(default)]
    pub methods: Vec<NodeId>,
    #[serde(default)]
    pub fields: Vec<NodeId>,
    #[serde(default)]
    pub enum_constants: Vec<NodeId>,
    #[serde(default)]
    pub constructors: Vec<NodeId>,
    #[serde(default)]
    pub nested: Vec<NodeId>,
    #[serde(default = "default_true")]
    pub documented: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberData {
    pub name: String,
    pub qualified_name: String,
    pub kind: MemberKind,
    pub enclosing: NodeId,
    #[serde(default)]
    pub params: Vec<Param>,
    /// `(type, type)` for methods and constructors, absent for fields.
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub comment: Comment,
    /// Compiler-provided default constructor.
    #[serde(default)]
    pub synthesized: bool,
    #[serde(default = "default_true")]
    pub documented: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// `@see`, `@link` or `@linkplain`.
    pub tag: String,
    /// Reference text as written, e.g. `com.acme.Foo#bar(int)`.
    pub text: String,
    #[serde(default)]
    pub label: String,
    pub holder: NodeId,
    #[serde(default)]
    pub target: ReferenceTarget,
    /// Label text nodes.
    #[serde(default)]
    pub inline: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextData {
    /// `Text`, `@code`, `@param`, `@return`, ...
    pub tag: String,
    pub text: String,
    pub holder: NodeId,
}

/// One arena slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    Root(RootData),
    Package(PackageData),
    Type(TypeData),
    Member(MemberData),
    Reference(ReferenceData),
    Text(TextData),
}

impl Element {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Root(_) => NodeKind::Root,
            Self::Package(_) => NodeKind::Package,
            Self::Type(t) => NodeKind::Type(t.kind),
            Self::Member(m) => NodeKind::Member(m.kind),
            Self::Reference(_) => NodeKind::Reference,
            Self::Text(_) => NodeKind::Text,
        }
    }

    pub fn comment(&self) -> Option<&Comment> {
        match self {
            Self::Package(p) => Some(&p.comment),
            Self::Type(t) => Some(&t.comment),
            Self::Member(m) => Some(&m.comment),
            _ => None,
        }
    }

    pub fn comment_mut(&mut self) -> Option<&mut Comment> {
        match self {
            Self::Package(p) => Some(&mut p.comment),
            Self::Type(t) => Some(&mut t.comment),
            Self::Member(m) => Some(&mut m.comment),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_simple_name_strips_package() {
        assert_eq!(Marker::new("Published").simple_name(), "Published");
        assert_eq!(
            Marker::new("nablarch.core.util.annotation.Published").simple_name(),
            "Published"
        );
    }

    #[test]
    fn element_serde_is_tagged() {
        let element = Element::Text(TextData {
            tag: "Text".into(),
            text: "hello".into(),
            holder: NodeId(3),
        });
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"element\":\"text\""));
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn ordinary_class_excludes_throwables() {
        assert!(TypeKind::Class.is_ordinary_class());
        assert!(!TypeKind::Exception.is_ordinary_class());
        assert!(!TypeKind::Interface.is_ordinary_class());
    }
}
