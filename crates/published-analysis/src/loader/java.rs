//! Java declaration extraction with tree-sitter.
//!
//! Produces a `CompilationUnit` of declarations with their raw (unqualified)
//! type text, modifiers, annotations and doc comments. Qualification and
//! graph assembly happen later, once every file has been read.

use std::fmt;
use std::path::{Path, PathBuf};

use published_core::config::AccessLevel;
use published_core::constants::TAG_ELEMENT;
use published_core::errors::LoadError;
use tree_sitter::{Node, Parser};

use super::resolve::{normalize_type_text, Import};
use crate::model::{MemberKind, TypeKind};

#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub path: PathBuf,
    pub package: String,
    /// Doc comment on the package declaration (`package-info.java`).
    pub package_doc: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Declared access; `None` is package-private.
    pub access: Option<AccessLevel>,
    pub is_static: bool,
    pub is_final: bool,
}

impl Modifiers {
    /// Declared access, or the implicit one when no keyword is present:
    /// public inside interfaces and annotation types, package otherwise.
    pub fn effective_access(&self, implicitly_public: bool) -> AccessLevel {
        match self.access {
            Some(access) => access,
            None if implicitly_public => AccessLevel::Public,
            None => AccessLevel::Package,
        }
    }
}

/// A `tag` element value as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Literal(String),
    /// `ARCHITECT`, `Tags.ARCHITECT` or a fully qualified constant.
    Constant(String),
    /// Operands of a `+` chain.
    Concat(Vec<TagValue>),
    Unsupported(String),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value:?}"),
            Self::Constant(name) | Self::Unsupported(name) => f.write_str(name),
            Self::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// An annotation on a declaration, tags not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDecl {
    pub name: String,
    pub tags: Vec<TagValue>,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub markers: Vec<MarkerDecl>,
    pub doc: Option<String>,
    pub type_params: Vec<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Record components, in order.
    pub components: Vec<ParamDecl>,
    pub members: Vec<MemberDecl>,
    pub nested: Vec<TypeDecl>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub type_text: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    pub enum_constant: bool,
    pub modifiers: Modifiers,
    pub markers: Vec<MarkerDecl>,
    pub doc: Option<String>,
    pub type_params: Vec<String>,
    pub params: Vec<ParamDecl>,
    /// String literal initializer of a field.
    pub constant: Option<String>,
}

/// Owns a tree-sitter parser configured for Java.
pub struct JavaSourceParser {
    parser: Parser,
}

impl JavaSourceParser {
    pub fn new() -> Result<Self, LoadError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| LoadError::GrammarUnavailable {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse one file. Any syntax error fails the file.
    pub fn parse(&mut self, path: &Path, source: &str) -> Result<CompilationUnit, LoadError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| LoadError::ParseFailed {
                path: path.to_path_buf(),
            })?;
        let root = tree.root_node();
        if root.has_error() {
            let (count, line) = count_errors(root);
            return Err(LoadError::Syntax {
                path: path.to_path_buf(),
                count,
                line,
            });
        }

        let src = source.as_bytes();
        let mut unit = CompilationUnit {
            path: path.to_path_buf(),
            package: String::new(),
            package_doc: None,
            imports: Vec::new(),
            types: Vec::new(),
        };
        for child in named_children(root) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(name) = named_children(child)
                        .into_iter()
                        .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"))
                    {
                        unit.package = compact(text(name, src));
                    }
                    unit.package_doc = doc_comment(child, src);
                }
                "import_declaration" => unit.imports.push(import(child, src)),
                _ => {
                    if let Some(decl) = type_decl(child, src) {
                        unit.types.push(decl);
                    }
                }
            }
        }
        Ok(unit)
    }
}

/// ERROR and MISSING nodes, plus the 1-based line of the first one.
fn count_errors(root: Node) -> (u32, u32) {
    let mut count = 0u32;
    let mut first_line = None;
    collect_errors(root, &mut count, &mut first_line);
    (count, first_line.unwrap_or(1))
}

fn collect_errors(node: Node, count: &mut u32, first_line: &mut Option<u32>) {
    if node.is_error() || node.is_missing() {
        *count += 1;
        first_line.get_or_insert(node.start_position().row as u32 + 1);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_errors(child, count, first_line);
        }
    }
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn text<'s>(node: Node, src: &'s [u8]) -> &'s str {
    node.utf8_text(src).unwrap_or("")
}

fn compact(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn import(node: Node, src: &[u8]) -> Import {
    let mut name = String::new();
    let mut on_demand = false;
    let mut is_static = false;
    for child in children(node) {
        match child.kind() {
            "static" => is_static = true,
            "asterisk" => on_demand = true,
            "scoped_identifier" | "identifier" => name = compact(text(child, src)),
            _ => {}
        }
    }
    Import {
        name,
        on_demand,
        is_static,
    }
}

fn type_kind(node_kind: &str) -> Option<TypeKind> {
    match node_kind {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "annotation_type_declaration" => Some(TypeKind::AnnotationType),
        "record_declaration" => Some(TypeKind::Record),
        _ => None,
    }
}

fn type_decl(node: Node, src: &[u8]) -> Option<TypeDecl> {
    let kind = type_kind(node.kind())?;
    let name = text(node.child_by_field_name("name")?, src).to_string();
    let (modifiers, markers) = modifiers(node, src);

    let mut decl = TypeDecl {
        name,
        kind,
        modifiers,
        markers,
        doc: doc_comment(node, src),
        type_params: type_params(node, src),
        superclass: None,
        interfaces: Vec::new(),
        components: Vec::new(),
        members: Vec::new(),
        nested: Vec::new(),
        line: node.start_position().row as u32 + 1,
    };

    for child in named_children(node) {
        match child.kind() {
            "superclass" => {
                decl.superclass = named_children(child)
                    .into_iter()
                    .last()
                    .map(|t| normalize_type_text(text(t, src)));
            }
            "super_interfaces" | "extends_interfaces" => {
                decl.interfaces.extend(type_list(child, src));
            }
            _ => {}
        }
    }
    if kind == TypeKind::Record {
        if let Some(params) = node.child_by_field_name("parameters") {
            decl.components = params_of(params, src);
        }
    }
    if let Some(body) = node.child_by_field_name("body") {
        body_members(body, src, &mut decl);
    }
    Some(decl)
}

fn type_list(node: Node, src: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    for child in named_children(node) {
        if child.kind() == "type_list" {
            out.extend(
                named_children(child)
                    .into_iter()
                    .map(|t| normalize_type_text(text(t, src))),
            );
        }
    }
    out
}

fn type_params(node: Node, src: &[u8]) -> Vec<String> {
    let Some(params) = node.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    named_children(params)
        .into_iter()
        .filter(|p| p.kind() == "type_parameter")
        .filter_map(|p| {
            named_children(p)
                .into_iter()
                .find(|n| matches!(n.kind(), "type_identifier" | "identifier"))
                .map(|n| text(n, src).to_string())
        })
        .collect()
}

/// Members and nested types of a class, interface, enum, record or
/// annotation body.
fn body_members(body: Node, src: &[u8], decl: &mut TypeDecl) {
    for child in named_children(body) {
        match child.kind() {
            "enum_constant" => {
                if let Some(name) = child.child_by_field_name("name") {
                    let (modifiers, markers) = modifiers(child, src);
                    decl.members.push(MemberDecl {
                        name: text(name, src).to_string(),
                        kind: MemberKind::Field,
                        enum_constant: true,
                        modifiers,
                        markers,
                        doc: doc_comment(child, src),
                        type_params: Vec::new(),
                        params: Vec::new(),
                        constant: None,
                    });
                }
            }
            "enum_body_declarations" => body_members(child, src, decl),
            "method_declaration" | "annotation_type_element_declaration" => {
                if let Some(member) = callable(child, src, MemberKind::Method) {
                    decl.members.push(member);
                }
            }
            "constructor_declaration" | "compact_constructor_declaration" => {
                if let Some(mut member) = callable(child, src, MemberKind::Constructor) {
                    if child.kind() == "compact_constructor_declaration" {
                        member.params = decl.components.clone();
                    }
                    decl.members.push(member);
                }
            }
            "field_declaration" | "constant_declaration" => {
                let (modifiers, markers) = modifiers(child, src);
                let doc = doc_comment(child, src);
                let mut cursor = child.walk();
                for declarator in child.children_by_field_name("declarator", &mut cursor) {
                    if let Some(name) = declarator.child_by_field_name("name") {
                        let constant = declarator
                            .child_by_field_name("value")
                            .filter(|v| v.kind() == "string_literal")
                            .map(|v| unquote(text(v, src)));
                        decl.members.push(MemberDecl {
                            name: text(name, src).to_string(),
                            kind: MemberKind::Field,
                            enum_constant: false,
                            modifiers: modifiers.clone(),
                            markers: markers.clone(),
                            doc: doc.clone(),
                            type_params: Vec::new(),
                            params: Vec::new(),
                            constant,
                        });
                    }
                }
            }
            _ => {
                if let Some(nested) = type_decl(child, src) {
                    decl.nested.push(nested);
                }
            }
        }
    }
}

fn callable(node: Node, src: &[u8], kind: MemberKind) -> Option<MemberDecl> {
    let name = text(node.child_by_field_name("name")?, src).to_string();
    let (modifiers, markers) = modifiers(node, src);
    let params = node
        .child_by_field_name("parameters")
        .map(|p| params_of(p, src))
        .unwrap_or_default();
    Some(MemberDecl {
        name,
        kind,
        enum_constant: false,
        modifiers,
        markers,
        doc: doc_comment(node, src),
        type_params: type_params(node, src),
        params,
        constant: None,
    })
}

/// Formal parameters with array dimensions and varargs folded into the type.
fn params_of(node: Node, src: &[u8]) -> Vec<ParamDecl> {
    let mut out = Vec::new();
    for param in named_children(node) {
        match param.kind() {
            "formal_parameter" => {
                let Some(ty) = param.child_by_field_name("type") else {
                    continue;
                };
                let mut type_text = normalize_type_text(text(ty, src));
                if let Some(dims) = param.child_by_field_name("dimensions") {
                    type_text.push_str(&compact(text(dims, src)));
                }
                let name = param
                    .child_by_field_name("name")
                    .map(|n| text(n, src).to_string())
                    .unwrap_or_default();
                out.push(ParamDecl { type_text, name });
            }
            "spread_parameter" => {
                let mut type_text = String::new();
                let mut name = String::new();
                for child in named_children(param) {
                    match child.kind() {
                        "modifiers" => {}
                        "variable_declarator" => {
                            name = child
                                .child_by_field_name("name")
                                .map(|n| text(n, src).to_string())
                                .unwrap_or_default();
                        }
                        _ if type_text.is_empty() => {
                            type_text = normalize_type_text(text(child, src));
                        }
                        _ => {}
                    }
                }
                type_text.push_str("...");
                out.push(ParamDecl { type_text, name });
            }
            _ => {}
        }
    }
    out
}

/// Access keywords and annotations from a declaration's `modifiers` child.
fn modifiers(node: Node, src: &[u8]) -> (Modifiers, Vec<MarkerDecl>) {
    let mut mods = Modifiers::default();
    let mut markers = Vec::new();
    let Some(list) = named_children(node).into_iter().find(|n| n.kind() == "modifiers") else {
        return (mods, markers);
    };
    for child in children(list) {
        match child.kind() {
            "public" => mods.access = Some(AccessLevel::Public),
            "protected" => mods.access = Some(AccessLevel::Protected),
            "private" => mods.access = Some(AccessLevel::Private),
            "static" => mods.is_static = true,
            "final" => mods.is_final = true,
            "marker_annotation" | "annotation" => {
                if let Some(marker) = marker(child, src) {
                    markers.push(marker);
                }
            }
            _ => {}
        }
    }
    (mods, markers)
}

/// An annotation as a marker; tags come from its `tag` element only.
fn marker(node: Node, src: &[u8]) -> Option<MarkerDecl> {
    let name = compact(text(node.child_by_field_name("name")?, src));
    let mut marker = MarkerDecl {
        name,
        tags: Vec::new(),
    };
    if let Some(args) = node.child_by_field_name("arguments") {
        for pair in named_children(args) {
            if pair.kind() != "element_value_pair" {
                continue;
            }
            let key = pair.child_by_field_name("key").map(|k| text(k, src));
            if key != Some(TAG_ELEMENT) {
                continue;
            }
            if let Some(value) = pair.child_by_field_name("value") {
                match value.kind() {
                    "element_value_array_initializer" => marker
                        .tags
                        .extend(
                            named_children(value)
                                .into_iter()
                                .filter(|v| !v.is_extra())
                                .map(|v| tag_value(v, src)),
                        ),
                    _ => marker.tags.push(tag_value(value, src)),
                }
            }
        }
    }
    Some(marker)
}

fn tag_value(node: Node, src: &[u8]) -> TagValue {
    match node.kind() {
        "string_literal" => TagValue::Literal(unquote(text(node, src))),
        "identifier" | "field_access" | "scoped_identifier" => TagValue::Constant(compact(text(node, src))),
        "parenthesized_expression" => match named_children(node).into_iter().next() {
            Some(inner) => tag_value(inner, src),
            None => TagValue::Unsupported(compact(text(node, src))),
        },
        "binary_expression"
            if node.child_by_field_name("operator").map(|o| text(o, src)) == Some("+") =>
        {
            let mut parts = Vec::new();
            for side in ["left", "right"] {
                match node.child_by_field_name(side).map(|n| tag_value(n, src)) {
                    Some(TagValue::Concat(inner)) => parts.extend(inner),
                    Some(part) => parts.push(part),
                    None => return TagValue::Unsupported(text(node, src).to_string()),
                }
            }
            TagValue::Concat(parts)
        }
        _ => TagValue::Unsupported(text(node, src).to_string()),
    }
}

fn unquote(literal: &str) -> String {
    let s = literal.trim();
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s).to_string()
}

/// The `/** */` block comment directly before a declaration, skipping line
/// comments.
fn doc_comment(node: Node, src: &[u8]) -> Option<String> {
    let mut prev = node.prev_named_sibling();
    while let Some(sibling) = prev {
        match sibling.kind() {
            "line_comment" => prev = sibling.prev_named_sibling(),
            "block_comment" => {
                let body = text(sibling, src);
                return body.starts_with("/**").then(|| body.to_string());
            }
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CompilationUnit {
        let mut parser = JavaSourceParser::new().unwrap();
        parser.parse(Path::new("Test.java"), source).unwrap()
    }

    #[test]
    fn package_imports_and_class() {
        let unit = parse(
            r#"
            package com.acme;

            import java.util.List;
            import java.io.*;
            import static java.util.Objects.requireNonNull;

            /** A widget. */
            @Published
            public class Widget<T> extends Base implements Runnable, Comparable<Widget<T>> {
                /** Builds. */
                public Widget(List<T> items, int... sizes) {}
                @Published(tag = {"architect", "senior"})
                protected void run(String[] args, T value) {}
                private int hidden;
                public static final String A = "a", B = "b";
            }
            "#,
        );
        assert_eq!(unit.package, "com.acme");
        assert_eq!(unit.imports.len(), 3);
        assert!(unit.imports[1].on_demand);
        assert!(unit.imports[2].is_static);

        let widget = &unit.types[0];
        assert_eq!(widget.name, "Widget");
        assert_eq!(widget.kind, TypeKind::Class);
        assert_eq!(widget.type_params, vec!["T"]);
        assert_eq!(widget.superclass.as_deref(), Some("Base"));
        assert_eq!(widget.interfaces, vec!["Runnable", "Comparable<Widget<T>>"]);
        assert_eq!(widget.doc.as_deref(), Some("/** A widget. */"));
        assert_eq!(widget.markers[0].name, "Published");

        let ctor = &widget.members[0];
        assert_eq!(ctor.kind, MemberKind::Constructor);
        assert_eq!(ctor.params[0].type_text, "List<T>");
        assert_eq!(ctor.params[1].type_text, "int...");

        let run = &widget.members[1];
        assert_eq!(run.modifiers.access, Some(AccessLevel::Protected));
        assert_eq!(
            run.markers[0].tags,
            vec![TagValue::Literal("architect".into()), TagValue::Literal("senior".into())]
        );
        assert_eq!(run.params[0].type_text, "String[]");
        assert!(run.doc.is_none());

        let fields: Vec<_> = widget
            .members
            .iter()
            .filter(|m| m.kind == MemberKind::Field)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(fields, vec!["hidden", "A", "B"]);
    }

    #[test]
    fn enums_interfaces_and_nested() {
        let unit = parse(
            r#"
            package p;
            public interface Shape extends Comparable<Shape> {
                double area();
                enum Kind { /** Round. */ CIRCLE, SQUARE; Kind() {} }
                @interface Tagged { String[] tag() default {}; }
            }
            "#,
        );
        let shape = &unit.types[0];
        assert_eq!(shape.kind, TypeKind::Interface);
        assert_eq!(shape.interfaces, vec!["Comparable<Shape>"]);
        assert_eq!(shape.members[0].name, "area");
        assert_eq!(shape.nested.len(), 2);

        let kind = &shape.nested[0];
        assert_eq!(kind.kind, TypeKind::Enum);
        let constants: Vec<_> = kind.members.iter().filter(|m| m.enum_constant).collect();
        assert_eq!(constants.len(), 2);
        assert_eq!(constants[0].doc.as_deref(), Some("/** Round. */"));
        assert!(kind.members.iter().any(|m| m.kind == MemberKind::Constructor));

        assert_eq!(shape.nested[1].kind, TypeKind::AnnotationType);
        assert_eq!(shape.nested[1].members[0].name, "tag");
    }

    #[test]
    fn single_string_tag_value() {
        let unit = parse(
            r#"
            @Published(tag = "architect")
            class Tagged {}
            "#,
        );
        assert_eq!(unit.package, "");
        assert_eq!(unit.types[0].markers[0].tags, vec![TagValue::Literal("architect".into())]);
    }

    #[test]
    fn tag_constants_and_expressions_are_kept_as_written() {
        let unit = parse(
            r#"
            class Tags {
                static final String ARCHITECT = "architect";
                @Published(tag = {Tags.ARCHITECT, "sen" + ("ior"), PREFIX + Tags.SUFFIX, tags()[0]})
                void m() {}
            }
            "#,
        );
        let tags = &unit.types[0].members;
        assert_eq!(tags[0].constant.as_deref(), Some("architect"));
        assert!(tags[0].modifiers.is_static && tags[0].modifiers.is_final);
        assert_eq!(
            tags[1].markers[0].tags,
            vec![
                TagValue::Constant("Tags.ARCHITECT".into()),
                TagValue::Concat(vec![TagValue::Literal("sen".into()), TagValue::Literal("ior".into())]),
                TagValue::Concat(vec![
                    TagValue::Constant("PREFIX".into()),
                    TagValue::Constant("Tags.SUFFIX".into()),
                ]),
                TagValue::Unsupported("tags()[0]".into()),
            ]
        );
        assert_eq!(tags[1].markers[0].tags[2].to_string(), "PREFIX + Tags.SUFFIX");
    }

    #[test]
    fn package_info_doc() {
        let unit = parse("/** Core API. */\npackage com.acme.core;\n");
        assert_eq!(unit.package, "com.acme.core");
        assert_eq!(unit.package_doc.as_deref(), Some("/** Core API. */"));
        assert!(unit.types.is_empty());
    }

    #[test]
    fn syntax_error_fails_the_file() {
        let mut parser = JavaSourceParser::new().unwrap();
        let err = parser
            .parse(Path::new("Broken.java"), "package p;\npublic class Broken {\n  void m( {}\n")
            .unwrap_err();
        assert!(matches!(err, LoadError::Syntax { count, .. } if count > 0));
    }

    #[test]
    fn line_comment_between_doc_and_declaration() {
        let unit = parse(
            r#"
            class A {
                /** Documented. */
                // trailing note
                public void m() {}
            }
            "#,
        );
        assert_eq!(unit.types[0].members[0].doc.as_deref(), Some("/** Documented. */"));
    }
}
