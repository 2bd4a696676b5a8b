//! Shared batch logic: run the compiled email graph for many emails and report each one.
//!
//! Used by [`run_with_config`](super::run_with_config) and by tests that compile the graph
//! with their own `MockGenerator`.

use std::io::Write;

use futures::StreamExt;

use mailgraph::{CompiledStateGraph, EmailState, RunOutcome, RunnableConfig};

use crate::config::RunConfig;

use super::report::RunReport;
use super::Error;

/// Reports of a finished batch, in completion order.
#[derive(Clone, Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<RunReport>,
}

impl BatchSummary {
    /// Runs that ended in `"error"`.
    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_error()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.len() - self.failed()
    }
}

/// Runs `ids` through `graph`, at most `config.concurrency()` at a time, writing one JSON
/// line per email to `out` as each run finishes.
pub async fn run_batch<W>(
    graph: &CompiledStateGraph<EmailState>,
    ids: Vec<String>,
    config: &RunConfig,
    out: &mut W,
) -> Result<BatchSummary, Error>
where
    W: Write,
{
    tracing::info!(emails = ids.len(), concurrency = config.concurrency(), "starting batch");
    let reports = futures::stream::iter(ids)
        .map(|id| run_email(graph, id, config))
        .buffer_unordered(config.concurrency());
    futures::pin_mut!(reports);

    let mut summary = BatchSummary::default();
    while let Some(report) = reports.next().await {
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
        summary.reports.push(report);
    }
    out.flush()?;

    tracing::info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "batch complete"
    );
    Ok(summary)
}

/// Consumes one run's stream up to its terminal emission.
pub async fn run_email(
    graph: &CompiledStateGraph<EmailState>,
    id: String,
    config: &RunConfig,
) -> RunReport {
    let mut run_config = RunnableConfig::default();
    if let Some(timeout) = config.run_timeout {
        run_config = run_config.with_timeout(timeout);
    }

    let mut events = graph.stream(EmailState::seed(id.clone()), run_config);
    let mut outcome: Option<RunOutcome<EmailState>> = None;
    let mut steps = Vec::new();
    while let Some(event) = events.next().await {
        tracing::info!(
            item_id = %id,
            step = %event.step,
            next = %event.state.current_step,
            "step done"
        );
        let terminal = event.is_terminal();
        steps.push(event.step);
        outcome = Some(RunOutcome {
            state: event.state,
            steps: Vec::new(),
            fault: event.fault,
        });
        if terminal {
            break;
        }
    }

    match outcome {
        Some(mut outcome) => {
            outcome.steps = steps;
            if !outcome.state.error.is_empty() {
                tracing::warn!(item_id = %id, error = %outcome.state.error, "email run failed");
            }
            RunReport::from_outcome(outcome)
        }
        None => RunReport::silent(id),
    }
}
