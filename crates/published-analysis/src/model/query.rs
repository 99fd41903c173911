//! The closed set of node-shaped queries and the answers they produce.

use super::types::{MemberKind, NodeKind};

/// Every query whose answer is a node or a collection of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Packages,
    Classes,
    AllClasses,
    OrdinaryClasses,
    Interfaces,
    Enums,
    Exceptions,
    Errors,
    AnnotationTypes,
    InnerClasses,
    Methods,
    Fields,
    EnumConstants,
    Constructors,
    InlineTags,
    FirstSentenceTags,
    Tags,
    SeeTags,
    Superclass,
    ContainingPackage,
    ContainingClass,
    ReferencedMember,
    ReferencedClass,
    ReferencedPackage,
    Holder,
}

impl Query {
    pub const ALL: [Query; 25] = [
        Query::Packages,
        Query::Classes,
        Query::AllClasses,
        Query::OrdinaryClasses,
        Query::Interfaces,
        Query::Enums,
        Query::Exceptions,
        Query::Errors,
        Query::AnnotationTypes,
        Query::InnerClasses,
        Query::Methods,
        Query::Fields,
        Query::EnumConstants,
        Query::Constructors,
        Query::InlineTags,
        Query::FirstSentenceTags,
        Query::Tags,
        Query::SeeTags,
        Query::Superclass,
        Query::ContainingPackage,
        Query::ContainingClass,
        Query::ReferencedMember,
        Query::ReferencedClass,
        Query::ReferencedPackage,
        Query::Holder,
    ];

    /// Element kind of a collection-valued query, `None` for single-valued
    /// queries.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            Query::Packages => Some(ElementKind::Package),
            Query::Classes
            | Query::AllClasses
            | Query::OrdinaryClasses
            | Query::Interfaces
            | Query::Enums
            | Query::Exceptions
            | Query::Errors
            | Query::AnnotationTypes
            | Query::InnerClasses => Some(ElementKind::Type),
            Query::Methods => Some(ElementKind::Method),
            Query::Fields | Query::EnumConstants => Some(ElementKind::Field),
            Query::Constructors => Some(ElementKind::Constructor),
            Query::InlineTags | Query::FirstSentenceTags | Query::Tags => Some(ElementKind::Tag),
            Query::SeeTags => Some(ElementKind::Reference),
            Query::Superclass
            | Query::ContainingPackage
            | Query::ContainingClass
            | Query::ReferencedMember
            | Query::ReferencedClass
            | Query::ReferencedPackage
            | Query::Holder => None,
        }
    }

    pub fn is_collection(self) -> bool {
        self.element_kind().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            Query::Packages => "packages",
            Query::Classes => "classes",
            Query::AllClasses => "allClasses",
            Query::OrdinaryClasses => "ordinaryClasses",
            Query::Interfaces => "interfaces",
            Query::Enums => "enums",
            Query::Exceptions => "exceptions",
            Query::Errors => "errors",
            Query::AnnotationTypes => "annotationTypes",
            Query::InnerClasses => "innerClasses",
            Query::Methods => "methods",
            Query::Fields => "fields",
            Query::EnumConstants => "enumConstants",
            Query::Constructors => "constructors",
            Query::InlineTags => "inlineTags",
            Query::FirstSentenceTags => "firstSentenceTags",
            Query::Tags => "tags",
            Query::SeeTags => "seeTags",
            Query::Superclass => "superclass",
            Query::ContainingPackage => "containingPackage",
            Query::ContainingClass => "containingClass",
            Query::ReferencedMember => "referencedMember",
            Query::ReferencedClass => "referencedClass",
            Query::ReferencedPackage => "referencedPackage",
            Query::Holder => "holder",
        }
    }
}

/// Element type of a typed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Package,
    Type,
    Method,
    Field,
    Constructor,
    /// Text or reference.
    Tag,
    Reference,
}

impl ElementKind {
    pub fn admits(self, kind: NodeKind) -> bool {
        match self {
            ElementKind::Package => kind == NodeKind::Package,
            ElementKind::Type => matches!(kind, NodeKind::Type(_)),
            ElementKind::Method => kind == NodeKind::Member(MemberKind::Method),
            ElementKind::Field => kind == NodeKind::Member(MemberKind::Field),
            ElementKind::Constructor => kind == NodeKind::Member(MemberKind::Constructor),
            ElementKind::Tag => matches!(kind, NodeKind::Text | NodeKind::Reference),
            ElementKind::Reference => kind == NodeKind::Reference,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Package => "package",
            ElementKind::Type => "type",
            ElementKind::Method => "method",
            ElementKind::Field => "field",
            ElementKind::Constructor => "constructor",
            ElementKind::Tag => "tag",
            ElementKind::Reference => "reference",
        }
    }
}

/// A collection whose element type is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<N> {
    pub kind: ElementKind,
    pub items: Vec<N>,
}

impl<N> Collection<N> {
    pub fn empty(kind: ElementKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }
}

/// Answer to a node-shaped query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<N> {
    Absent,
    Node(N),
    /// A sequence whose element type cannot be read off the answer.
    Sequence(Vec<N>),
    Collection(Collection<N>),
}

impl<N> Answer<N> {
    pub fn shape(&self) -> &'static str {
        match self {
            Answer::Absent => "absent",
            Answer::Node(_) => "node",
            Answer::Sequence(_) => "sequence",
            Answer::Collection(_) => "collection",
        }
    }
}
