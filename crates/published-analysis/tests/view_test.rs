//! Filtering view behaviour: re-typing, shape errors, failure propagation,
//! identity and stacking.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use published_analysis::model::{
    Collection, ElementKind, GraphBuilder, Marker, MemberKind, MemberSpec, TypeKind, TypeSpec,
};
use published_analysis::{
    Answer, DocNode, FilteringView, InclusionPolicy, NodeId, NodeKind, Query, Verdict,
    WhitelistEmitter,
};
use published_core::errors::{GraphError, QueryError};

/// What a stub node answers to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Fail,
    NodeForEverything,
    EmptySequence,
    FieldCollection,
    PackageSequence,
}

#[derive(Debug, Clone)]
struct Stub {
    id: u32,
    kind: NodeKind,
    behavior: Behavior,
}

impl Stub {
    fn new(id: u32, kind: NodeKind, behavior: Behavior) -> Self {
        Self { id, kind, behavior }
    }
}

impl PartialEq for Stub {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Stub {}

impl Hash for Stub {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Stub {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Stub {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl DocNode for Stub {
    fn id(&self) -> NodeId {
        NodeId(self.id)
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn qualified_name(&self) -> &str {
        "p.stub"
    }

    fn markers(&self) -> &[Marker] {
        &[]
    }

    fn comment_text(&self) -> &str {
        ""
    }

    fn signature(&self) -> Option<&str> {
        None
    }

    fn label(&self) -> Option<&str> {
        None
    }

    fn is_included(&self) -> bool {
        true
    }

    fn is_subtype_of(&self, other: &Self) -> Result<bool, QueryError> {
        Ok(self.id == other.id)
    }

    fn overrides(&self, _other: &Self) -> Result<bool, QueryError> {
        Ok(false)
    }

    fn query(&self, _query: Query) -> Result<Answer<Self>, QueryError> {
        let child = |kind| Stub::new(self.id + 1, kind, Behavior::EmptySequence);
        match self.behavior {
            Behavior::Fail => Err(GraphError::Source("toolchain exploded".into()).into()),
            Behavior::NodeForEverything => Ok(Answer::Node(child(NodeKind::Package))),
            Behavior::EmptySequence => Ok(Answer::Sequence(Vec::new())),
            Behavior::FieldCollection => Ok(Answer::Collection(Collection::empty(ElementKind::Field))),
            Behavior::PackageSequence => Ok(Answer::Sequence(vec![child(NodeKind::Package)])),
        }
    }
}

fn policy() -> InclusionPolicy {
    InclusionPolicy::new("Published", Vec::<String>::new())
}

fn root_stub(behavior: Behavior) -> Stub {
    Stub::new(0, NodeKind::Root, behavior)
}

fn assert_shape_error(result: Result<Answer<impl DocNode>, QueryError>, query: &str) {
    match result {
        Err(QueryError::UnsupportedQueryShape { query: q, .. }) => assert_eq!(q, query),
        other => panic!("expected an unsupported shape for {query}, got {other:?}"),
    }
}

#[test]
fn underlying_failures_propagate_unchanged() {
    let policy = policy();
    let view = FilteringView::new(&policy);
    let root = view.wrap_root(root_stub(Behavior::Fail));
    match root.query(Query::Classes) {
        Err(QueryError::Graph(GraphError::Source(message))) => assert_eq!(message, "toolchain exploded"),
        other => panic!("expected the graph failure, got {other:?}"),
    }

    // Evaluating a type asks the graph for its members, so wrapping fails too.
    let ty = Stub::new(5, NodeKind::Type(TypeKind::Class), Behavior::Fail);
    assert!(matches!(view.wrap(ty, Verdict::Evaluate), Err(QueryError::Graph(_))));
}

#[test]
fn shape_mismatches_are_fatal() {
    let policy = policy();
    let view = FilteringView::new(&policy);

    let node_answers = view.wrap_root(root_stub(Behavior::NodeForEverything));
    assert_shape_error(node_answers.query(Query::Methods), "methods");

    let sequence_answers = view.wrap_root(root_stub(Behavior::EmptySequence));
    assert_shape_error(sequence_answers.query(Query::Superclass), "superclass");

    let wrong_collection = view.wrap_root(root_stub(Behavior::FieldCollection));
    assert_shape_error(wrong_collection.query(Query::Constructors), "constructors");
    assert!(wrong_collection.query(Query::EnumConstants).is_ok());

    let wrong_elements = view.wrap_root(root_stub(Behavior::PackageSequence));
    assert_shape_error(wrong_elements.query(Query::Methods), "methods");
    assert!(wrong_elements.query(Query::Packages).is_ok());
}

#[test]
fn sequences_are_retyped_by_query() {
    let policy = policy();
    let view = FilteringView::new(&policy);
    let root = view.wrap_root(root_stub(Behavior::EmptySequence));
    for query in Query::ALL.iter().copied().filter(|q| q.is_collection()) {
        match root.query(query).unwrap() {
            Answer::Collection(c) => assert_eq!(Some(c.kind), query.element_kind()),
            other => panic!("{} answered {other:?}", query.name()),
        }
    }
}

#[test]
fn absent_answers_skip_the_policy() {
    let policy = policy();
    let view = FilteringView::new(&policy);
    let answer: Answer<Stub> = Answer::Absent;
    assert!(matches!(view.filter(Query::ReferencedMember, answer), Ok(Answer::Absent)));
}

#[test]
fn enum_constants_come_back_as_fields() {
    let mut b = GraphBuilder::new();
    let e = b
        .add_type(TypeSpec::new("p", "Color", TypeKind::Enum).marker(Marker::new("Published")))
        .unwrap();
    b.add_member(e, MemberSpec::enum_constant("RED")).unwrap();
    let graph = b.build();
    let policy = policy();
    let ty = FilteringView::new(&policy)
        .wrap(graph.node(e).unwrap(), Verdict::Evaluate)
        .unwrap();

    match ty.query(Query::EnumConstants).unwrap() {
        Answer::Collection(c) => {
            assert_eq!(c.kind, ElementKind::Field);
            assert_eq!(c.items.len(), 1);
            assert_eq!(c.items[0].kind(), NodeKind::Member(MemberKind::Field));
        }
        other => panic!("unexpected answer {other:?}"),
    }
}

#[test]
fn verdicts_at_wrap_time() {
    let mut b = GraphBuilder::new();
    let plain = b.add_type(TypeSpec::class("p", "Plain")).unwrap();
    let graph = b.build();
    let policy = policy();
    let view = FilteringView::new(&policy);
    let node = graph.node(plain).unwrap();

    assert!(view.wrap(node, Verdict::Underlying).unwrap().is_included());
    assert!(!view.wrap(node, Verdict::Excluded).unwrap().is_included());
    assert!(!view.wrap(node, Verdict::Evaluate).unwrap().is_included());
}

#[test]
fn identity_uses_the_underlying_node() {
    let mut b = GraphBuilder::new();
    let base = b.add_type(TypeSpec::class("p", "Base").marker(Marker::new("Published"))).unwrap();
    let m = b.add_member(base, MemberSpec::method("m")).unwrap();
    let graph = b.build();
    let policy = policy();
    let view = FilteringView::new(&policy);

    let a = view.wrap(graph.node(base).unwrap(), Verdict::Evaluate).unwrap();
    let b = view.wrap(graph.node(base).unwrap(), Verdict::Excluded).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), Ordering::Equal);
    assert!(a.is_subtype_of(&b).unwrap());

    let mut set = std::collections::HashSet::new();
    set.insert(a.clone());
    assert!(set.contains(&b));

    let method = view.wrap(graph.node(m).unwrap(), Verdict::Evaluate).unwrap();
    assert!(!method.overrides(&method).unwrap());
    assert_eq!(method.node(Query::ContainingClass).unwrap(), Some(a));
}

#[test]
fn stacked_views_filter_once() {
    let mut b = GraphBuilder::new();
    let shown = b.add_type(TypeSpec::class("p", "Shown").marker(Marker::new("Published"))).unwrap();
    b.add_member(shown, MemberSpec::method("m")).unwrap();
    let mixed = b.add_type(TypeSpec::class("p", "Mixed")).unwrap();
    b.add_member(mixed, MemberSpec::method("yes").marker(Marker::new("Published"))).unwrap();
    b.add_member(mixed, MemberSpec::method("no")).unwrap();
    b.add_type(TypeSpec::class("q", "Gone")).unwrap();
    let graph = b.build();
    let policy = policy();
    let view = FilteringView::new(&policy);

    let once = view.wrap_root(graph.root().unwrap());
    let twice = view.wrap_root(once.clone());

    let once_types: Vec<String> = once
        .nodes(Query::Classes)
        .unwrap()
        .iter()
        .map(|t| t.qualified_name().to_string())
        .collect();
    let twice_types: Vec<String> = twice
        .nodes(Query::Classes)
        .unwrap()
        .iter()
        .map(|t| t.qualified_name().to_string())
        .collect();
    assert_eq!(once_types, vec!["p.Shown".to_string(), "p.Mixed".to_string()]);
    assert_eq!(once_types, twice_types);

    let emitter = WhitelistEmitter::new(&policy);
    assert_eq!(emitter.collect(&once).unwrap(), emitter.collect(&twice).unwrap());
    assert_eq!(
        emitter.collect(&once).unwrap().entries(),
        ["p.Shown".to_string(), "p.Mixed.yes()".to_string()]
    );
}
