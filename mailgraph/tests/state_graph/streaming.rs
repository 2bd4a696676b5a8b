//! Stream, steps and Run surfaces of a compiled graph.

use std::sync::Arc;

use futures::StreamExt;
use mailgraph::{RunnableConfig, StateGraph, StepStreamExt, WorkflowState, END, START};

use crate::common::{FlowState, Stamp};

fn chain() -> mailgraph::CompiledStateGraph<FlowState> {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("fetch", Arc::new(Stamp::new("fetch")))
        .add_node("categorize", Arc::new(Stamp::then("categorize", END)))
        .add_edge(START, "fetch")
        .add_edge("fetch", "categorize");
    graph.compile().expect("chain compiles")
}

/// **Scenario**: Each emission carries the step name, its delta and the merged state.
#[tokio::test]
async fn stream_yields_step_and_state_pairs() {
    let events: Vec<_> = chain()
        .stream(FlowState::seed("E1"), RunnableConfig::default())
        .collect()
        .await;
    let steps: Vec<&str> = events.iter().map(|e| e.step.as_str()).collect();
    assert_eq!(steps, vec!["fetch", "categorize"]);
    assert_eq!(events[0].update.trail, Some(vec!["fetch".to_string()]));
    assert_eq!(events[0].state.current_step(), "categorize");
    assert_eq!(events[1].state.trail, vec!["fetch", "categorize"]);
    assert!(events[1].is_terminal());
}

/// **Scenario**: steps() and stream() fold to the same final state.
#[tokio::test]
async fn steps_and_stream_agree() {
    let graph = chain();
    let from_steps = graph
        .steps(FlowState::seed("E1"), RunnableConfig::default())
        .final_state()
        .await
        .expect("events");
    let from_stream = graph
        .stream(FlowState::seed("E1"), RunnableConfig::default())
        .final_state()
        .await
        .expect("events");
    assert_eq!(from_steps, from_stream);
}

/// **Scenario**: Run can be stepped by hand; nothing runs between calls.
#[tokio::test]
async fn run_is_pull_based() {
    let graph = chain();
    let mut run = graph.start(
        FlowState::seed("E1"),
        RunnableConfig::default().with_run_id("manual"),
    );
    assert_eq!(run.run_id(), "manual");
    assert_eq!(run.state().current_step(), "fetch");
    assert_eq!(run.invocations(), 0);

    let first = run.next_event().await.expect("fetch event");
    assert_eq!(first.step, "fetch");
    assert_eq!(run.invocations(), 1);

    let second = run.next_event().await.expect("categorize event");
    assert!(second.is_end());
    assert!(run.next_event().await.is_none());
    assert!(run.next_event().await.is_none());
    assert_eq!(run.into_state().trail.len(), 2);
}

/// **Scenario**: Entry override in the config starts the run at another step.
#[tokio::test]
async fn config_entry_override() {
    let outcome = chain()
        .stream(
            FlowState::seed("E1"),
            RunnableConfig::default().with_entry("categorize"),
        )
        .into_outcome()
        .await
        .expect("one event");
    assert_eq!(outcome.steps, vec!["categorize"]);
}
