//! Graph assembly from parsed compilation units.
//!
//! Three passes: index every visible type name and every string constant,
//! add types and members with qualified parameter types, resolved marker
//! tags and their doc tags, then resolve supertypes, throwable kinds and
//! cross-references against the finished arena.

use published_core::config::AccessLevel;
use published_core::errors::{GraphError, LoadError};
use published_core::types::collections::FxHashSet;

use super::java::{CompilationUnit, MarkerDecl, MemberDecl, TagValue, TypeDecl};
use super::javadoc::{self, DocTag};
use super::resolve::{Scope, TypeIndex};
use crate::model::{
    DocGraph, Element, GraphBuilder, Marker, MemberKind, MemberSpec, NodeId, Param, ReferenceTarget,
    TagSlot, TypeKind, TypeRef, TypeSpec,
};

/// Superclass/interface names awaiting node ids.
struct PendingSupertypes {
    ty: NodeId,
    superclass: Option<String>,
    interfaces: Vec<String>,
}

/// A reference tag awaiting resolution, with the scope of its holder.
struct PendingReference {
    reference: NodeId,
    text: String,
    scope: Scope,
    /// Type whose members `#member` refers to.
    context_type: Option<NodeId>,
}

pub struct GraphAssembler {
    access: AccessLevel,
    index: TypeIndex,
    builder: GraphBuilder,
    supertypes: Vec<PendingSupertypes>,
    references: Vec<PendingReference>,
}

impl GraphAssembler {
    pub fn new(access: AccessLevel) -> Self {
        Self {
            access,
            index: TypeIndex::default(),
            builder: GraphBuilder::new(),
            supertypes: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn assemble(mut self, units: &[CompilationUnit]) -> Result<DocGraph, LoadError> {
        for unit in units {
            for decl in &unit.types {
                self.index_type(decl, &unit.package, None, false);
                self.index_constants(decl, &qualify(&unit.package, None, &decl.name));
            }
        }
        for unit in units {
            let scope = Scope {
                package: unit.package.clone(),
                imports: unit.imports.clone(),
                enclosing: Vec::new(),
                type_params: Vec::new(),
            };
            if let Some(raw) = &unit.package_doc {
                let doc = javadoc::parse(raw);
                let package = self.builder.package(&unit.package);
                self.builder.set_package_comment(package, &doc.description)?;
                self.add_doc_tags(package, &doc, &scope, None)?;
            }
            for decl in &unit.types {
                self.add_type(decl, &scope, None, false)?;
            }
        }
        self.resolve_supertypes()?;
        self.classify_throwables()?;
        self.resolve_references()?;
        let graph = self.builder.build();
        tracing::debug!(elements = graph.len(), types = graph.type_count(), "graph assembled");
        Ok(graph)
    }

    fn visible(&self, declared: AccessLevel) -> bool {
        declared >= self.access
    }

    fn index_type(&mut self, decl: &TypeDecl, package: &str, outer: Option<&str>, in_interface: bool) {
        if !self.visible(decl.modifiers.effective_access(in_interface)) {
            return;
        }
        let qualified = qualify(package, outer, &decl.name);
        let nested_in_interface = matches!(decl.kind, TypeKind::Interface | TypeKind::AnnotationType);
        for nested in &decl.nested {
            self.index_type(nested, package, Some(&qualified), nested_in_interface);
        }
        self.index.insert(qualified);
    }

    /// String constants are indexed whatever their access: annotations in
    /// the declaring type may use private ones.
    fn index_constants(&mut self, decl: &TypeDecl, qualified: &str) {
        let implicitly_final = matches!(decl.kind, TypeKind::Interface | TypeKind::AnnotationType);
        for member in &decl.members {
            let Some(value) = &member.constant else {
                continue;
            };
            if implicitly_final || member.modifiers.is_final {
                self.index.insert_constant(qualified, &member.name, value.clone());
            }
        }
        for nested in &decl.nested {
            self.index_constants(nested, &qualify("", Some(qualified), &nested.name));
        }
    }

    /// Resolve every tag of `decls`; a tag that is not a string constant
    /// expression fails the load.
    fn markers(&self, holder: &str, decls: &[MarkerDecl], scope: &Scope) -> Result<Vec<Marker>, LoadError> {
        decls
            .iter()
            .map(|decl| -> Result<Marker, LoadError> {
                let mut marker = Marker::new(decl.name.clone());
                for value in &decl.tags {
                    let tag = self.tag(value, scope).ok_or_else(|| LoadError::TagValue {
                        holder: holder.to_string(),
                        value: value.to_string(),
                    })?;
                    marker.tags.push(tag);
                }
                Ok(marker)
            })
            .collect()
    }

    fn tag(&self, value: &TagValue, scope: &Scope) -> Option<String> {
        match value {
            TagValue::Literal(text) => Some(text.clone()),
            TagValue::Constant(name) => self.index.resolve_constant(name, scope).map(str::to_string),
            TagValue::Concat(parts) => parts.iter().map(|part| self.tag(part, scope)).collect(),
            TagValue::Unsupported(_) => None,
        }
    }

    fn add_type(
        &mut self,
        decl: &TypeDecl,
        scope: &Scope,
        enclosing: Option<NodeId>,
        in_interface: bool,
    ) -> Result<(), LoadError> {
        let access = decl.modifiers.effective_access(in_interface);
        if !self.visible(access) {
            return Ok(());
        }
        let doc = decl.doc.as_deref().map(javadoc::parse).unwrap_or_default();
        let mut spec = TypeSpec::new(scope.package.clone(), decl.name.clone(), decl.kind)
            .comment(doc.description.clone());
        spec.enclosing = enclosing;
        spec.type_params = decl.type_params.clone();
        let holder = qualify(&scope.package, scope.enclosing.last().map(String::as_str), &decl.name);
        spec.markers = self.markers(&holder, &decl.markers, scope)?;
        let ty = self.builder.add_type(spec)?;
        let qualified = self.builder.type_data(ty)?.qualified_name.clone();
        let scope = scope.nested(&qualified, &decl.type_params);

        self.add_doc_tags(ty, &doc, &scope, Some(ty))?;
        let superclass = decl.superclass.as_ref().map(|s| self.index.qualify_type(s, &scope));
        let interfaces = decl
            .interfaces
            .iter()
            .map(|i| self.index.qualify_type(i, &scope))
            .collect();
        self.supertypes.push(PendingSupertypes {
            ty,
            superclass,
            interfaces,
        });

        let members_public = matches!(decl.kind, TypeKind::Interface | TypeKind::AnnotationType);
        let mut has_constructor = false;
        for member in &decl.members {
            if member.kind == MemberKind::Constructor {
                has_constructor = true;
            }
            let declared = if member.enum_constant {
                AccessLevel::Public
            } else {
                member.modifiers.effective_access(members_public)
            };
            if !self.visible(declared) {
                continue;
            }
            self.add_member(ty, member, &scope)?;
        }

        if !has_constructor && matches!(decl.kind, TypeKind::Class | TypeKind::Record) {
            self.add_default_constructor(ty, decl, access, &scope)?;
        }

        for nested in &decl.nested {
            self.add_type(nested, &scope, Some(ty), members_public)?;
        }
        Ok(())
    }

    fn add_member(&mut self, ty: NodeId, member: &MemberDecl, scope: &Scope) -> Result<(), LoadError> {
        let scope = scope.with_type_params(&member.type_params);
        let doc = member.doc.as_deref().map(javadoc::parse).unwrap_or_default();
        let mut spec = match member.kind {
            MemberKind::Method => MemberSpec::method(member.name.clone()),
            MemberKind::Constructor => MemberSpec::constructor(),
            MemberKind::Field if member.enum_constant => MemberSpec::enum_constant(member.name.clone()),
            MemberKind::Field => MemberSpec::field(member.name.clone()),
        };
        for param in &member.params {
            spec = spec.param(self.index.qualify_type(&param.type_text, &scope), param.name.clone());
        }
        let owner = scope.enclosing.last().map(String::as_str).unwrap_or_default();
        spec.markers = self.markers(&format!("{owner}#{}", member.name), &member.markers, &scope)?;
        spec.comment = doc.description.clone();
        let id = self.builder.add_member(ty, spec)?;
        self.add_doc_tags(id, &doc, &scope, Some(ty))?;
        Ok(())
    }

    /// The no-arg constructor the compiler provides for a class without one
    /// (the canonical one for a record). Carries no comment.
    fn add_default_constructor(
        &mut self,
        ty: NodeId,
        decl: &TypeDecl,
        access: AccessLevel,
        scope: &Scope,
    ) -> Result<(), GraphError> {
        if !self.visible(access) {
            return Ok(());
        }
        let mut spec = MemberSpec::constructor().synthesized();
        for component in &decl.components {
            spec = spec.param(self.index.qualify_type(&component.type_text, scope), component.name.clone());
        }
        self.builder.add_member(ty, spec)?;
        Ok(())
    }

    fn add_doc_tags(
        &mut self,
        holder: NodeId,
        doc: &javadoc::Javadoc,
        scope: &Scope,
        context_type: Option<NodeId>,
    ) -> Result<(), GraphError> {
        let slots = [
            (TagSlot::Inline, &doc.inline),
            (TagSlot::FirstSentence, &doc.first_sentence),
            (TagSlot::Block, &doc.block),
        ];
        for (slot, tags) in slots {
            for tag in tags {
                match tag {
                    DocTag::Text { tag, text } => {
                        self.builder.add_text(holder, slot, tag, text)?;
                    }
                    DocTag::Reference {
                        tag,
                        reference,
                        label,
                    } => {
                        let id = self.builder.add_reference(holder, slot, tag, reference, label)?;
                        self.references.push(PendingReference {
                            reference: id,
                            text: reference.clone(),
                            scope: scope.clone(),
                            context_type,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_supertypes(&mut self) -> Result<(), GraphError> {
        for pending in std::mem::take(&mut self.supertypes) {
            if let Some(name) = pending.superclass {
                let node = self.builder.find_type(&erase(&name));
                self.builder.set_superclass(pending.ty, TypeRef { name, node })?;
            }
            for name in pending.interfaces {
                let node = self.builder.find_type(&erase(&name));
                self.builder.add_interface(pending.ty, TypeRef { name, node })?;
            }
        }
        Ok(())
    }

    /// Classes extending `java.*Exception` or `java.*Error`, directly or
    /// through loaded classes, become exceptions or errors.
    fn classify_throwables(&mut self) -> Result<(), GraphError> {
        let classes: Vec<NodeId> = self
            .builder
            .type_ids()
            .into_iter()
            .filter(|&id| matches!(self.builder.type_data(id).map(|t| t.kind), Ok(TypeKind::Class)))
            .collect();
        for id in classes {
            if let Some(kind) = self.throwable_kind(id)? {
                self.builder.set_type_kind(id, kind)?;
            }
        }
        Ok(())
    }

    fn throwable_kind(&self, id: NodeId) -> Result<Option<TypeKind>, GraphError> {
        let mut seen = FxHashSet::default();
        let mut current = id;
        while seen.insert(current) {
            let Some(superclass) = self.builder.type_data(current)?.superclass.as_ref() else {
                return Ok(None);
            };
            match superclass.node {
                Some(next) => current = next,
                None => {
                    let name = erase(&superclass.name);
                    if name.starts_with("java.") && name.ends_with("Exception") {
                        return Ok(Some(TypeKind::Exception));
                    }
                    if name.starts_with("java.") && name.ends_with("Error") {
                        return Ok(Some(TypeKind::Error));
                    }
                    return Ok(None);
                }
            }
        }
        Ok(None)
    }

    fn resolve_references(&mut self) -> Result<(), GraphError> {
        let mut unresolved = 0usize;
        for pending in std::mem::take(&mut self.references) {
            let target = self.resolve_reference(&pending)?;
            if target.is_unresolved() {
                unresolved += 1;
                tracing::debug!(reference = %pending.text, "cross-reference left unresolved");
            }
            self.builder.set_reference_target(pending.reference, target)?;
        }
        if unresolved > 0 {
            tracing::info!(unresolved, "unresolved cross-references will be excluded");
        }
        Ok(())
    }

    fn resolve_reference(&self, pending: &PendingReference) -> Result<ReferenceTarget, GraphError> {
        let (type_part, member_part) = match pending.text.split_once('#') {
            Some((t, m)) => (t.trim(), Some(m.trim())),
            None => (pending.text.trim(), None),
        };

        let class = if type_part.is_empty() {
            pending.context_type
        } else {
            let qualified = self.index.qualify_name(type_part, &pending.scope);
            self.builder.find_type(&qualified)
        };

        let Some(class) = class else {
            if member_part.is_none() {
                if let Some(package) = self.builder.find_package(type_part) {
                    return Ok(ReferenceTarget {
                        member: None,
                        class: None,
                        package: Some(package),
                    });
                }
            }
            return Ok(ReferenceTarget::default());
        };
        let member = match member_part {
            Some(member) => self.find_member(class, member, &pending.scope)?,
            None => None,
        };
        let class = match member {
            Some(m) => match self.builder.element(m)? {
                Element::Member(data) => data.enclosing,
                _ => class,
            },
            None if member_part.is_some() => return Ok(ReferenceTarget::default()),
            None => class,
        };
        Ok(ReferenceTarget {
            member,
            class: Some(class),
            package: Some(self.builder.type_data(class)?.package),
        })
    }

    /// `name` or `name(Type, Type)` in `class` or its loaded supertypes.
    fn find_member(&self, class: NodeId, member: &str, scope: &Scope) -> Result<Option<NodeId>, GraphError> {
        let (name, args) = match member.split_once('(') {
            Some((name, rest)) => {
                let inner = rest.trim_end().trim_end_matches(')');
                let args: Vec<String> = if inner.trim().is_empty() {
                    Vec::new()
                } else {
                    split_args(inner)
                        .iter()
                        .map(|a| self.index.qualify_type(a, scope))
                        .collect()
                };
                (name.trim(), Some(args))
            }
            None => (member.trim(), None),
        };

        let mut seen = FxHashSet::default();
        let mut stack = vec![class];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let data = self.builder.type_data(current)?;
            let candidates: Vec<NodeId> = match args {
                None => data
                    .fields
                    .iter()
                    .chain(&data.enum_constants)
                    .chain(&data.methods)
                    .chain(&data.constructors)
                    .copied()
                    .collect(),
                Some(_) => data.methods.iter().chain(&data.constructors).copied().collect(),
            };
            for candidate in candidates {
                let Element::Member(m) = self.builder.element(candidate)? else {
                    continue;
                };
                if m.name != name {
                    continue;
                }
                match &args {
                    None => return Ok(Some(candidate)),
                    Some(args) if params_match(&m.params, args) => return Ok(Some(candidate)),
                    Some(_) => {}
                }
            }
            stack.extend(data.superclass.iter().filter_map(|s| s.node));
            stack.extend(data.interfaces.iter().filter_map(|i| i.node));
        }
        Ok(None)
    }
}

fn qualify(package: &str, outer: Option<&str>, name: &str) -> String {
    match outer {
        Some(outer) => format!("{outer}.{name}"),
        None if package.is_empty() => name.to_string(),
        None => format!("{package}.{name}"),
    }
}

/// Parameter lists match on erased types, comparing simple names when only
/// one side is qualified.
fn params_match(params: &[Param], args: &[String]) -> bool {
    params.len() == args.len()
        && params.iter().zip(args).all(|(p, a)| {
            let declared = erase(&p.type_name);
            let written = erase(a);
            declared == written || simple(&declared) == simple(&written)
        })
}

fn simple(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

/// Type name without generic arguments.
fn erase(type_name: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(type_name.len());
    for ch in type_name.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Split `Map<K, V>, int` at top-level commas.
fn split_args(args: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in args.chars() {
        match ch {
            '<' => {
                depth += 1;
                current.push(ch);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                out.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        out.push(current.trim().to_string());
    }
    out
}
