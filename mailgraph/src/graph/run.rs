//! The run loop: drives one run of a compiled graph, one step per `next_event` call.
//!
//! Per iteration: stop at a sentinel; check input, cancellation, deadline and step budget;
//! look up and invoke the node (panics and `Err` become faults); merge its patch; pick the next
//! step (a patch error forces `"error"`, then an explicit `current_step` beats the edge table);
//! emit the event. Hitting the deadline cancels the run's token so work spawned by a node stops
//! too; a caller's token is only observed through a child, never cancelled.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{AgentError, RunFault};
use crate::state::{is_sentinel, StatePatch, WorkflowState, ERROR};
use crate::stream::StepEvent;

use super::logging::{
    log_node_complete, log_node_start, log_run_complete, log_run_fault, log_run_start,
};
use super::{CompiledStateGraph, Node, RunContext, RunnableConfig};

/// One in-progress run. Pull events with [`Run::next_event`]; nothing executes between calls.
///
/// Created by `CompiledStateGraph::start`. Owns its state exclusively; the graph is only read.
pub struct Run<'g, S>
where
    S: WorkflowState,
{
    graph: &'g CompiledStateGraph<S>,
    state: S,
    run_id: String,
    budget: usize,
    invocations: usize,
    deadline: Option<Instant>,
    cancel: CancellationToken,
    finished: bool,
}

impl<'g, S> Run<'g, S>
where
    S: WorkflowState,
{
    pub(super) fn new(graph: &'g CompiledStateGraph<S>, seed: S, config: RunnableConfig) -> Self {
        let mut state = seed;
        let entry = config
            .entry
            .or_else(|| {
                let seeded = state.current_step();
                (!seeded.is_empty()).then(|| seeded.to_string())
            })
            .unwrap_or_else(|| graph.entry.clone());
        state.set_current_step(&entry);

        let run_id = config
            .run_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        log_run_start(&run_id, state.item_id(), &entry);

        Self {
            graph,
            state,
            run_id,
            budget: config.step_budget.unwrap_or(graph.budget).get(),
            invocations: 0,
            deadline: config.timeout.map(|t| Instant::now() + t),
            cancel: config
                .cancel
                .map(|parent| parent.child_token())
                .unwrap_or_else(CancellationToken::new),
            finished: false,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Current state; the final state once `next_event` has returned `None`.
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Node invocations so far.
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    /// Executes the next step and returns its event, or `None` once the run is over.
    pub async fn next_event(&mut self) -> Option<StepEvent<S>> {
        if self.finished {
            return None;
        }
        let step = self.state.current_step().to_string();
        if is_sentinel(&step) {
            self.finish();
            return None;
        }

        if self.invocations == 0 && self.state.item_id().is_empty() {
            return Some(self.fail(step, RunFault::MissingInput { field: "itemId" }));
        }
        if self.cancel.is_cancelled() {
            return Some(self.fail(step.clone(), RunFault::Cancelled { step }));
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.cancel.cancel();
            return Some(self.fail(step.clone(), RunFault::TimedOut { step }));
        }
        if self.invocations >= self.budget {
            let budget = self.budget;
            return Some(self.fail(step, RunFault::BudgetExceeded { budget }));
        }
        let node = match self.graph.nodes.get(&step) {
            Some(node) => Arc::clone(node),
            None => {
                let fault = RunFault::Misconfigured(format!("no node registered for step `{}`", step));
                return Some(self.fail(step, fault));
            }
        };

        self.invocations += 1;
        log_node_start(&self.run_id, &step, self.invocations);
        let ctx = RunContext {
            run_id: self.run_id.clone(),
            step: step.clone(),
            iteration: self.invocations,
            cancel: self.cancel.clone(),
        };
        let patch = match self.call_node(&step, node, &ctx).await {
            Ok(patch) => patch,
            Err(fault) => return Some(self.fail(step, fault)),
        };

        self.state.merge_patch(&patch);
        let next = if patch.error().is_some() {
            ERROR.to_string()
        } else if let Some(explicit) = patch.current_step() {
            explicit.to_string()
        } else {
            match self.graph.edges.next_step_for(&step, &self.state) {
                Ok(next) => next,
                Err(fault) => return Some(self.fail_after(step, fault, patch)),
            }
        };
        self.state.set_current_step(&next);
        log_node_complete(&self.run_id, &step, &next);

        let mut fault = None;
        if next == ERROR && self.state.error().is_none() {
            let silent = RunFault::SilentError { step: step.clone() };
            log_run_fault(&self.run_id, &step, &silent);
            self.state.merge_patch(&S::Patch::failure(silent.to_string()));
            fault = Some(silent);
        }
        if is_sentinel(&next) {
            self.finish();
        }

        Some(StepEvent {
            step,
            update: patch,
            state: self.state.clone(),
            fault,
        })
    }

    /// Invokes the node under the middleware, racing cancellation and the deadline.
    async fn call_node(
        &self,
        step: &str,
        node: Arc<dyn Node<S>>,
        ctx: &RunContext,
    ) -> Result<S::Patch, RunFault> {
        let state = &self.state;
        let inner: BoxFuture<'_, Result<S::Patch, AgentError>> =
            Box::pin(async move { node.run_with_context(state, ctx).await });
        let wrapped = async {
            match &self.graph.middleware {
                Some(middleware) => middleware.around_run(step, state, inner).await,
                None => inner.await,
            }
        };
        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RunFault::Cancelled { step: step.to_string() }),
            _ = expiry => {
                self.cancel.cancel();
                Err(RunFault::TimedOut { step: step.to_string() })
            }
            result = AssertUnwindSafe(wrapped).catch_unwind() => match result {
                Ok(Ok(patch)) => Ok(patch),
                Ok(Err(AgentError::ExecutionFailed(message))) => Err(RunFault::NodeFailed {
                    step: step.to_string(),
                    message,
                }),
                Err(payload) => Err(RunFault::NodePanicked {
                    step: step.to_string(),
                    message: panic_message(payload.as_ref()),
                }),
            },
        }
    }

    /// Stamps the state with a synthetic error and ends the run.
    fn fail(&mut self, step: String, fault: RunFault) -> StepEvent<S> {
        self.fail_after(step, fault, S::Patch::default())
    }

    /// Like `fail`, for a fault raised after `applied` was already merged: the event's
    /// update is that patch with the failure stamped over it.
    fn fail_after(&mut self, step: String, fault: RunFault, applied: S::Patch) -> StepEvent<S> {
        log_run_fault(&self.run_id, &step, &fault);
        let message = fault.to_string();
        self.state.merge_patch(&S::Patch::failure(message.clone()));
        self.finish();
        StepEvent {
            step,
            update: applied.into_failure(message),
            state: self.state.clone(),
            fault: Some(fault),
        }
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            log_run_complete(&self.run_id, self.state.current_step(), self.invocations);
        }
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
