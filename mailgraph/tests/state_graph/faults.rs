//! Synthetic error terminals: every fault ends the run in "error" with a readable message.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use mailgraph::{
    AgentError, Node, RunContext, RunFault, RunnableConfig, StateGraph, StatePatch, StepBudget,
    WorkflowState, END, ERROR, START,
};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::common::{FlowPatch, FlowState, Stamp};

/// **Scenario**: A router answering an undeclared step is a configuration fault.
#[tokio::test]
async fn undeclared_router_answer_is_misconfigured() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("a", Arc::new(Stamp::new("a")))
        .add_node("b", Arc::new(Stamp::then("b", "end")))
        .add_edge(START, "a")
        .add_conditional_edges("a", |_s: &FlowState| "c".to_string(), ["b"]);
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;

    assert_eq!(outcome.state.current_step(), ERROR);
    assert!(outcome.state.error.starts_with("graph misconfigured"));
    assert!(outcome.fault.as_ref().is_some_and(RunFault::is_configuration));
    assert_eq!(outcome.state.trail, vec!["a"]);
}

/// **Scenario**: A step with no outgoing rule and no explicit next step is misconfigured.
#[tokio::test]
async fn missing_outgoing_edge_is_misconfigured() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("a", Arc::new(Stamp::new("a")))
        .set_entry_point("a");
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert!(outcome.state.error.contains("has no outgoing edge"), "{}", outcome.state.error);
}

/// **Scenario**: A node's own error patch ends the run with its message, no executor fault.
#[tokio::test]
async fn node_error_patch_is_kept_verbatim() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_fn("a", |_s: FlowState| async {
            Ok(FlowPatch::failure("category store down"))
        })
        .add_node("b", Arc::new(Stamp::then("b", "end")))
        .add_edge(START, "a")
        .add_edge("a", "b");
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.steps, vec!["a"]);
    assert_eq!(outcome.state.error, "category store down");
    assert!(outcome.fault.is_none());
}

/// **Scenario**: Err from a node after partial progress keeps the progress in the final state.
#[tokio::test]
async fn node_err_keeps_partial_progress() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("a", Arc::new(Stamp::new("a")))
        .add_fn("b", |_s: FlowState| async {
            Err(AgentError::ExecutionFailed("generation timed out".into()))
        })
        .add_edge(START, "a")
        .add_edge("a", "b");
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.state.trail, vec!["a"]);
    assert!(outcome.state.error.contains("generation timed out"));
}

/// **Scenario**: Runaway loop under a budget of 5 stops after exactly 5 invocations.
#[tokio::test]
async fn runaway_loop_hits_budget() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("spin", Arc::new(Stamp::new("spin")))
        .set_entry_point("spin")
        .add_edge("spin", "spin");
    let graph = graph
        .compile_with_budget(StepBudget::new(5).expect("non-zero"))
        .unwrap();
    let outcome = graph.invoke(FlowState::seed("E1"), RunnableConfig::default()).await;

    assert_eq!(outcome.state.trail.len(), 5);
    assert_eq!(outcome.state.current_step(), ERROR);
    assert!(outcome.state.error.contains("step budget exceeded"));
    assert_eq!(outcome.visits("spin"), 6, "5 invocations plus the fault emission");
}

/// **Scenario**: A panicking node ends the run in error without crashing the process.
#[tokio::test]
async fn panicking_node_is_contained() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("a", Arc::new(Stamp::new("a")))
        .add_fn("b", |s: FlowState| async move {
            let parts: Vec<&str> = s.note.split(',').collect();
            // Index out of bounds on an empty note.
            let _second = parts[1];
            Ok(FlowPatch::default())
        })
        .add_edge(START, "a")
        .add_edge("a", "b");
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.state.current_step(), ERROR);
    assert!(!outcome.state.error.is_empty());
    assert!(matches!(outcome.fault, Some(RunFault::NodePanicked { .. })));
}

fn panicking_router_graph() -> mailgraph::CompiledStateGraph<FlowState> {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("a", Arc::new(Stamp::new("a")))
        .add_edge(START, "a")
        .add_conditional_edges(
            "a",
            |s: &FlowState| -> String {
                let hops: Vec<&str> = s.note.split('>').collect();
                // Index out of bounds on an empty note.
                hops[1].to_string()
            },
            [END],
        );
    graph.compile().unwrap()
}

/// **Scenario**: A panicking router ends invoke in a configuration fault instead of unwinding.
#[tokio::test]
async fn panicking_router_fails_invoke() {
    let outcome = panicking_router_graph()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.state.current_step(), ERROR);
    assert!(outcome.fault.as_ref().is_some_and(RunFault::is_configuration));
    assert!(
        outcome.state.error.contains("router for step `a` panicked"),
        "{}",
        outcome.state.error
    );
    assert_eq!(outcome.state.trail, vec!["a"]);
}

/// **Scenario**: On the spawned stream a panicking router still yields a terminal error event.
#[tokio::test]
async fn panicking_router_fails_stream() {
    let events: Vec<_> = panicking_router_graph()
        .stream(FlowState::seed("E1"), RunnableConfig::default())
        .collect()
        .await;
    assert_eq!(events.len(), 1);
    let last = &events[0];
    assert!(last.is_error());
    assert!(last.is_terminal());
    assert!(last.fault.as_ref().is_some_and(RunFault::is_configuration));
}

/// **Scenario**: A patch carrying an error but no step goes to "error", not along the edges.
#[tokio::test]
async fn error_field_without_step_ends_in_error() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_fn("a", |_s: FlowState| async {
            Ok(FlowPatch {
                error: Some("store down".into()),
                ..Default::default()
            })
        })
        .add_node("b", Arc::new(Stamp::new("b")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.steps, vec!["a"]);
    assert_eq!(outcome.state.current_step(), ERROR);
    assert_eq!(outcome.state.error, "store down");
    assert!(outcome.fault.is_none());
}

/// **Scenario**: An error beats an explicit non-error step in the same patch.
#[tokio::test]
async fn error_field_overrides_explicit_step() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_fn("a", |_s: FlowState| async {
            Ok(FlowPatch {
                error: Some("quota exhausted".into()),
                current_step: Some("b".into()),
                ..Default::default()
            })
        })
        .add_node("b", Arc::new(Stamp::then("b", END)))
        .add_edge(START, "a");
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(FlowState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.steps, vec!["a"]);
    assert_eq!(outcome.state.current_step(), ERROR);
    assert_eq!(outcome.state.error, "quota exhausted");
    assert!(outcome.state.trail.is_empty());
}

/// **Scenario**: A routing fault after the merge keeps the node's own update in the event.
#[tokio::test]
async fn routing_fault_event_keeps_node_update() {
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("a", Arc::new(Stamp::new("a")))
        .set_entry_point("a");
    let events: Vec<_> = graph
        .compile()
        .unwrap()
        .steps(FlowState::seed("E1"), RunnableConfig::default())
        .collect()
        .await;
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.update.trail, Some(vec!["a".to_string()]));
    assert_eq!(event.update.current_step.as_deref(), Some(ERROR));
    assert!(
        event.update.error.as_deref().unwrap_or_default().contains("has no outgoing edge"),
        "{:?}",
        event.update
    );
    assert_eq!(event.state.trail, vec!["a"], "node patch merged once");
}

/// Hands `ctx.cancel` to a watcher task, then outlives any reasonable timeout.
struct Watched(std::sync::Mutex<Option<oneshot::Sender<()>>>);

#[async_trait]
impl Node<FlowState> for Watched {
    async fn run(&self, _state: &FlowState) -> Result<FlowPatch, AgentError> {
        Err(AgentError::ExecutionFailed("context required".into()))
    }

    async fn run_with_context(
        &self,
        _state: &FlowState,
        ctx: &RunContext,
    ) -> Result<FlowPatch, AgentError> {
        let cancel = ctx.cancel.clone();
        let fired = self.0.lock().unwrap().take();
        tokio::spawn(async move {
            cancel.cancelled().await;
            if let Some(fired) = fired {
                let _ = fired.send(());
            }
        });
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(FlowPatch::goto(END))
    }
}

/// **Scenario**: Hitting the deadline fires the run's token; the caller's own token stays live.
#[tokio::test]
async fn timeout_fires_run_token_only() {
    let (tx, rx) = oneshot::channel();
    let mut graph = StateGraph::<FlowState>::new();
    graph
        .add_node("slow", Arc::new(Watched(std::sync::Mutex::new(Some(tx)))))
        .set_entry_point("slow");
    let caller = CancellationToken::new();
    let outcome = graph
        .compile()
        .unwrap()
        .invoke(
            FlowState::seed("E1"),
            RunnableConfig::default()
                .with_timeout(Duration::from_millis(20))
                .with_cancel(caller.clone()),
        )
        .await;

    assert!(matches!(outcome.fault, Some(RunFault::TimedOut { .. })));
    tokio::time::timeout(Duration::from_secs(1), rx)
        .await
        .expect("run token fired on timeout")
        .expect("watcher reported");
    assert!(!caller.is_cancelled());
}
