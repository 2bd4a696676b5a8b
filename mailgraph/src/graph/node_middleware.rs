//! Node middleware: wraps every node invocation of a compiled graph.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::AgentError;
use crate::state::WorkflowState;

/// Wraps each node run. Implementations must poll `inner` exactly once and return its result,
/// optionally logging or timing around it.
///
/// **Interaction**: Attached with `StateGraph::with_middleware`; called by the run loop for
/// every node invocation.
#[async_trait]
pub trait NodeMiddleware<S>: Send + Sync
where
    S: WorkflowState,
{
    async fn around_run<'a>(
        &'a self,
        node_id: &'a str,
        state: &'a S,
        inner: BoxFuture<'a, Result<S::Patch, AgentError>>,
    ) -> Result<S::Patch, AgentError>;
}
