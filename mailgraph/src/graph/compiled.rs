//! Compiled state graph: immutable, shareable across concurrent runs.
//!
//! Built by `StateGraph::compile`. Holds the node registry, the edge table, the entry step,
//! the step budget and optional middleware. Each run owns its own state; nothing here is
//! mutated by a run, so one compiled graph can drive many runs at once.

use std::collections::HashMap;
use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::state::WorkflowState;
use crate::stream::{RunOutcome, StepEvent};

use super::config::StepBudget;
use super::edge::EdgeTable;
use super::node_middleware::NodeMiddleware;
use super::run::Run;
use super::{Node, RunnableConfig};

/// Keeps a spawned run at most one step ahead of its consumer.
const STREAM_BUFFER: usize = 1;

/// Compiled graph: immutable structure, runs from `entry` until a sentinel step.
#[derive(Clone)]
pub struct CompiledStateGraph<S>
where
    S: WorkflowState,
{
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) edges: EdgeTable<S>,
    pub(super) entry: String,
    pub(super) budget: StepBudget,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> CompiledStateGraph<S>
where
    S: WorkflowState,
{
    /// Declared entry step.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Default step budget for runs of this graph.
    pub fn budget(&self) -> StepBudget {
        self.budget
    }

    pub fn contains_step(&self, step: &str) -> bool {
        self.nodes.contains_key(step)
    }

    /// Starts a run without executing anything; drive it with `Run::next_event`.
    pub fn start(&self, seed: S, config: RunnableConfig) -> Run<'_, S> {
        Run::new(self, seed, config)
    }

    /// Lazy stream of step events, executed on the caller's task as it is polled.
    pub fn steps(
        &self,
        seed: S,
        config: RunnableConfig,
    ) -> impl Stream<Item = StepEvent<S>> + Send + '_ {
        futures::stream::unfold(self.start(seed, config), |mut run| async move {
            run.next_event().await.map(|event| (event, run))
        })
    }

    /// Spawns the run and streams its events through a bounded channel.
    ///
    /// Dropping the stream stops the run before its next node invocation.
    pub fn stream(&self, seed: S, config: RunnableConfig) -> ReceiverStream<StepEvent<S>> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let graph = self.clone();

        tokio::spawn(async move {
            let mut run = graph.start(seed, config);
            while let Some(event) = run.next_event().await {
                if tx.send(event).await.is_err() {
                    tracing::debug!(run_id = run.run_id(), "stream consumer dropped, stopping run");
                    break;
                }
            }
        });

        ReceiverStream::new(rx)
    }

    /// Runs to a sentinel on the caller's task and folds the events into a `RunOutcome`.
    ///
    /// Never returns an error: every fault ends as an `"error"`-stamped final state.
    pub async fn invoke(&self, seed: S, config: RunnableConfig) -> RunOutcome<S> {
        let mut run = self.start(seed, config);
        let mut steps = Vec::new();
        let mut fault = None;
        while let Some(event) = run.next_event().await {
            steps.push(event.step);
            if event.fault.is_some() {
                fault = event.fault;
            }
        }
        RunOutcome {
            state: run.into_state(),
            steps,
            fault,
        }
    }
}
