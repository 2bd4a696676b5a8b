//! StateGraph compile failure cases: unknown node, missing entry, conflicting rules.

use std::sync::Arc;

use mailgraph::{CompilationError, StateGraph, START};

use crate::common::{FlowState, Stamp};

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<FlowState>::new();
    graph.add_node("stamp", Arc::new(Stamp::new("stamp")));
    graph.add_edge(START, "stamp");
    graph.add_edge("stamp", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        _ => panic!("expected NodeNotFound"),
    }
}

#[tokio::test]
async fn compile_fails_when_edge_starts_at_unknown_node() {
    let mut graph = StateGraph::<FlowState>::new();
    graph.add_node("stamp", Arc::new(Stamp::new("stamp")));
    graph.add_edge(START, "stamp");
    graph.add_edge("ghost", "stamp");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
        _ => panic!("expected NodeNotFound"),
    }
}

#[tokio::test]
async fn compile_fails_on_static_plus_conditional_rule() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("a", Arc::new(Stamp::new("a")))
        .add_node("b", Arc::new(Stamp::new("b")))
        .add_edge(START, "a")
        .add_conditional_edges("a", |_s: &FlowState| "b".to_string(), ["b"])
        .add_edge("a", "b");

    match graph.compile() {
        Err(CompilationError::DuplicateEdge(id)) => assert_eq!(id, "a"),
        _ => panic!("expected DuplicateEdge"),
    }
}
