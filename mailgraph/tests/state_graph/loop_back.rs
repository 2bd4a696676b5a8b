//! Shared step revisited with a different `next_step` hint each time.

use mailgraph::{RunnableConfig, StateGraph, StatePatch, WorkflowState, END, START};

use crate::common::{FlowPatch, FlowState};

/// Hints `b` leaves on successive visits.
const HINTS: [&str; 3] = ["x", "y", "done"];

fn loop_back_graph() -> mailgraph::CompiledStateGraph<FlowState> {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_fn("a", |_s: FlowState| async { Ok(FlowPatch::default()) })
        .add_fn("b", |s: FlowState| async move {
            let visit = s.visits + 1;
            let hint = HINTS[(visit as usize - 1).min(HINTS.len() - 1)];
            Ok(FlowPatch {
                visits: Some(visit),
                note: Some(format!("visit {} set {}", visit, hint)),
                next_step: Some(hint.to_string()),
                trail: Some(vec![hint.to_string()]),
                ..Default::default()
            })
        })
        .add_fn("c", |s: FlowState| async move {
            Ok(FlowPatch {
                note: Some(format!("c read: {}", s.note)),
                ..FlowPatch::goto(END)
            })
        })
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_conditional_edges(
            "b",
            |s: &FlowState| {
                if s.next_step == "done" {
                    "c".to_string()
                } else {
                    "b".to_string()
                }
            },
            ["b", "c"],
        );
    graph.compile().expect("loop-back graph compiles")
}

/// **Scenario**: b is reached three times with hints x, y, done; c sees what the third visit set.
#[tokio::test]
async fn shared_step_visited_once_per_hint() {
    let outcome = loop_back_graph()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;

    assert_eq!(outcome.steps, vec!["a", "b", "b", "b", "c"]);
    assert_eq!(outcome.visits("b"), 3);
    assert_eq!(outcome.state.trail, vec!["x", "y", "done"]);
    assert_eq!(outcome.state.note, "c read: visit 3 set done");
    assert_eq!(outcome.state.current_step(), END);
}

/// **Scenario**: Seeding `current_step` starts the run there instead of the declared entry.
#[tokio::test]
async fn seeded_current_step_overrides_entry() {
    let mut seed = FlowState::seed("E1");
    seed.current_step = "c".into();
    let outcome = loop_back_graph().invoke(seed, RunnableConfig::default()).await;
    assert_eq!(outcome.steps, vec!["c"]);
    assert_eq!(outcome.state.visits, 0);
}

/// **Scenario**: Fields no node touches keep their defaults for the whole run.
#[tokio::test]
async fn untouched_fields_keep_defaults() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_fn("only", |_s: FlowState| async {
            Ok(FlowPatch {
                note: Some("set".into()),
                ..FlowPatch::goto(END)
            })
        })
        .set_entry_point("only");
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.state.visits, 0);
    assert!(outcome.state.trail.is_empty());
    assert!(outcome.state.next_step.is_empty());
    assert!(outcome.state.error.is_empty());
}
