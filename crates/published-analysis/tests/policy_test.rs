//! Inclusion rules over hand-built graphs.

use published_analysis::model::{
    GraphBuilder, Marker, MemberSpec, ReferenceTarget, TagSlot, TypeKind, TypeRef, TypeSpec,
};
use published_analysis::{DocNode, InclusionPolicy, NodeId, Query};

fn published() -> Marker {
    Marker::new("Published")
}

fn policy(tags: &[&str]) -> InclusionPolicy {
    InclusionPolicy::new("Published", tags.iter().copied())
}

#[test]
fn package_follows_its_types() {
    let mut b = GraphBuilder::new();
    let a = b.add_type(TypeSpec::class("p.one", "A").marker(published())).unwrap();
    b.add_type(TypeSpec::class("p.two", "B")).unwrap();
    b.package("p.empty");
    let graph = b.build();
    let policy = policy(&[]);

    let one = graph.node(graph.type_data(a).unwrap().package).unwrap();
    assert!(policy.included(&one).unwrap());

    let packages = graph.root().unwrap().nodes(Query::Packages).unwrap();
    let verdicts: Vec<(String, bool)> = packages
        .iter()
        .map(|p| (p.qualified_name().to_string(), policy.included(p).unwrap()))
        .collect();
    assert_eq!(
        verdicts,
        vec![
            ("p.one".to_string(), true),
            ("p.two".to_string(), false),
            ("p.empty".to_string(), false),
        ]
    );
}

#[test]
fn package_counts_nested_types() {
    let mut b = GraphBuilder::new();
    let outer = b.add_type(TypeSpec::class("p", "Outer")).unwrap();
    b.add_type(TypeSpec::class("p", "Inner").nested_in(outer).marker(published()))
        .unwrap();
    let graph = b.build();
    let package = graph.root().unwrap().nodes(Query::Packages).unwrap().remove(0);
    assert!(policy(&[]).included(&package).unwrap());
}

#[test]
fn type_included_by_own_marker_or_direct_member() {
    let mut b = GraphBuilder::new();
    let marked = b.add_type(TypeSpec::class("p", "Marked").marker(published())).unwrap();
    let via_field = b.add_type(TypeSpec::class("p", "ViaField")).unwrap();
    b.add_member(via_field, MemberSpec::field("F").marker(published())).unwrap();
    let via_ctor = b.add_type(TypeSpec::class("p", "ViaCtor")).unwrap();
    b.add_member(via_ctor, MemberSpec::constructor().marker(published())).unwrap();
    let bare = b.add_type(TypeSpec::class("p", "Bare")).unwrap();
    b.add_member(bare, MemberSpec::method("m")).unwrap();
    let graph = b.build();
    let policy = policy(&[]);

    for (id, expected) in [(marked, true), (via_field, true), (via_ctor, true), (bare, false)] {
        let node = graph.node(id).unwrap();
        assert_eq!(policy.included(&node).unwrap(), expected, "{}", node.qualified_name());
    }
}

#[test]
fn inner_types_never_include_the_outer_type() {
    let mut b = GraphBuilder::new();
    let outer = b.add_type(TypeSpec::class("p", "Outer")).unwrap();
    let inner = b
        .add_type(TypeSpec::class("p", "Inner").nested_in(outer).marker(published()))
        .unwrap();
    let graph = b.build();
    let policy = policy(&[]);
    assert!(!policy.included(&graph.node(outer).unwrap()).unwrap());
    assert!(policy.included(&graph.node(inner).unwrap()).unwrap());
}

#[test]
fn inheritance_and_interfaces_are_ignored() {
    let mut b = GraphBuilder::new();
    let base = b.add_type(TypeSpec::class("p", "Base").marker(published())).unwrap();
    let api = b.add_type(TypeSpec::new("p", "Api", TypeKind::Interface)).unwrap();
    b.add_member(api, MemberSpec::method("run").marker(published())).unwrap();
    let sub = b.add_type(TypeSpec::class("p", "Sub")).unwrap();
    b.set_superclass(sub, TypeRef { name: "p.Base".into(), node: Some(base) }).unwrap();
    b.add_interface(sub, TypeRef { name: "p.Api".into(), node: Some(api) }).unwrap();
    b.add_member(sub, MemberSpec::method("run")).unwrap();
    let graph = b.build();
    let policy = policy(&[]);

    let sub = graph.node(sub).unwrap();
    assert!(sub.is_subtype_of(&graph.node(base).unwrap()).unwrap());
    assert!(!policy.included(&sub).unwrap());
}

#[test]
fn member_rules() {
    let mut b = GraphBuilder::new();
    let marked = b.add_type(TypeSpec::class("p", "Marked").marker(published())).unwrap();
    let method = b.add_member(marked, MemberSpec::method("m")).unwrap();
    let documented_ctor = b
        .add_member(marked, MemberSpec::constructor().param("int", "x").comment("Documented."))
        .unwrap();
    let implicit_ctor = b.add_member(marked, MemberSpec::constructor().synthesized()).unwrap();

    let plain = b.add_type(TypeSpec::class("p", "Plain")).unwrap();
    let own = b.add_member(plain, MemberSpec::method("own").marker(published())).unwrap();
    let other = b.add_member(plain, MemberSpec::method("other")).unwrap();
    let tagged = b
        .add_member(plain, MemberSpec::method("tagged").marker(Marker::with_tags("Published", ["architect"])))
        .unwrap();
    let graph = b.build();

    let none = policy(&[]);
    let check = |policy: &InclusionPolicy, id: NodeId| policy.included(&graph.node(id).unwrap()).unwrap();
    assert!(check(&none, method));
    assert!(check(&none, documented_ctor));
    assert!(!check(&none, implicit_ctor));
    assert!(check(&none, own));
    assert!(!check(&none, other));
    assert!(!check(&none, tagged));
    assert!(check(&policy(&["architect"]), tagged));
}

#[test]
fn marked_undocumented_constructor_still_qualifies() {
    let mut b = GraphBuilder::new();
    let plain = b.add_type(TypeSpec::class("p", "Plain")).unwrap();
    let ctor = b.add_member(plain, MemberSpec::constructor().marker(published())).unwrap();
    let graph = b.build();
    assert!(policy(&[]).included(&graph.node(ctor).unwrap()).unwrap());
}

#[test]
fn references_mirror_member_then_class_then_package() {
    let mut b = GraphBuilder::new();
    let holder = b.add_type(TypeSpec::class("p", "Holder").marker(published())).unwrap();
    let shown = b.add_type(TypeSpec::class("p", "Shown").marker(published())).unwrap();
    let hidden = b.add_type(TypeSpec::class("q", "Hidden")).unwrap();
    let hidden_member = b.add_member(hidden, MemberSpec::method("m")).unwrap();
    let shown_member = b.add_member(shown, MemberSpec::method("m")).unwrap();
    let q = b.find_package("q").unwrap();

    let mut refs = Vec::new();
    let targets = [
        // Member wins over an included class.
        (ReferenceTarget { member: Some(hidden_member), class: Some(shown), package: None }, false),
        (ReferenceTarget { member: Some(shown_member), class: Some(shown), package: None }, true),
        (ReferenceTarget { member: None, class: Some(hidden), package: Some(q) }, false),
        (ReferenceTarget { member: None, class: None, package: Some(q) }, false),
        (ReferenceTarget::default(), false),
    ];
    for (target, expected) in targets {
        let r = b.add_reference(holder, TagSlot::Block, "@see", "x", "").unwrap();
        b.set_reference_target(r, target).unwrap();
        refs.push((r, expected));
    }
    let graph = b.build();
    let policy = policy(&[]);
    for (r, expected) in refs {
        assert_eq!(policy.included(&graph.node(r).unwrap()).unwrap(), expected, "reference {r}");
    }
}

#[test]
fn roots_and_text_are_always_included() {
    let mut b = GraphBuilder::new();
    let ty = b.add_type(TypeSpec::class("p", "A")).unwrap();
    let text = b.add_text(ty, TagSlot::Inline, "Text", "hello").unwrap();
    let graph = b.build();
    let policy = policy(&[]);
    assert!(policy.included(&graph.root().unwrap()).unwrap());
    assert!(policy.included(&graph.node(text).unwrap()).unwrap());
}
