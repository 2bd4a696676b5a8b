//! Graph node trait: one step in a StateGraph.
//!
//! Receives the current state, returns a partial update (patch). Failures are reported
//! either as an error patch (`StatePatch::failure`) or as `Err(AgentError)`; the executor
//! treats the latter like a crash and stops the run at the error terminal.

use std::future::Future;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::WorkflowState;

use super::RunContext;

/// One step in a graph: state in, patch out.
///
/// Nodes may do any async I/O. They must not assume a field is set without checking, and
/// calling one twice with the same state should give an equivalent patch.
///
/// **Interaction**: Registered with `StateGraph::add_node`; invoked by the run loop in
/// `CompiledStateGraph::stream` / `invoke`.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: WorkflowState,
{
    /// One step: read `state`, return only the fields this step computed.
    async fn run(&self, state: &S) -> Result<S::Patch, AgentError>;

    /// Variant with the run context (run id, iteration, cancellation token).
    ///
    /// Default implementation calls `run` and ignores the context.
    async fn run_with_context(&self, state: &S, _ctx: &RunContext) -> Result<S::Patch, AgentError> {
        self.run(state).await
    }
}

/// Node backed by an async closure over an owned copy of the state.
///
/// Built by `StateGraph::add_fn`; convenient for small steps and test stubs.
pub struct FnNode<F> {
    f: F,
}

impl<F> FnNode<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<S, F, Fut> Node<S> for FnNode<F>
where
    S: WorkflowState,
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = Result<S::Patch, AgentError>> + Send,
{
    async fn run(&self, state: &S) -> Result<S::Patch, AgentError> {
        (self.f)(state.clone()).await
    }
}
