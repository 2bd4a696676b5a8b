//! Logging middleware that records node enter/exit and duration around each node run.

use std::time::Instant;

use async_trait::async_trait;
use futures::future::BoxFuture;

use mailgraph::{AgentError, NodeMiddleware, StatePatch, WorkflowState};

/// Middleware that logs node enter/exit around each node run.
///
/// Events go through `tracing`, so they land on stderr next to the engine's own run events
/// and leave stdout free for the report.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

#[async_trait]
impl<S> NodeMiddleware<S> for LoggingMiddleware
where
    S: WorkflowState,
{
    async fn around_run<'a>(
        &'a self,
        node_id: &'a str,
        state: &'a S,
        inner: BoxFuture<'a, Result<S::Patch, AgentError>>,
    ) -> Result<S::Patch, AgentError> {
        let item_id = state.item_id();
        tracing::debug!(node = node_id, item_id, "enter node");
        let started = Instant::now();
        let result = inner.await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(patch) => tracing::debug!(
                node = node_id,
                item_id,
                elapsed_ms,
                goto = patch.current_step().unwrap_or("-"),
                "exit node"
            ),
            Err(e) => tracing::warn!(node = node_id, item_id, elapsed_ms, error = %e, "node failed"),
        }
        result
    }
}
