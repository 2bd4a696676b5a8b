//! Per-run config and the graph-wide step budget.

use std::num::NonZeroUsize;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Maximum number of node invocations in one run.
///
/// Held by every compiled graph; turns an accidental infinite loop into an error terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBudget(NonZeroUsize);

impl StepBudget {
    pub const DEFAULT: usize = 1000;

    /// `None` when `max_steps` is zero.
    pub fn new(max_steps: usize) -> Option<Self> {
        NonZeroUsize::new(max_steps).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for StepBudget {
    fn default() -> Self {
        Self(NonZeroUsize::new(Self::DEFAULT).unwrap_or(NonZeroUsize::MIN))
    }
}

/// Config for a single run.
///
/// **Interaction**: Passed to `CompiledStateGraph::stream` / `invoke`; exposed to nodes
/// through `RunContext`.
#[derive(Debug, Clone, Default)]
pub struct RunnableConfig {
    /// Correlation id for logs. A fresh uuid is used when unset.
    pub run_id: Option<String>,
    /// Step to start from. Falls back to the seed's `current_step`, then the graph entry.
    pub entry: Option<String>,
    /// Overrides the graph's step budget for this run.
    pub step_budget: Option<StepBudget>,
    /// Wall-clock limit for the whole run.
    pub timeout: Option<Duration>,
    /// External abort signal, checked before and during every node invocation.
    pub cancel: Option<CancellationToken>,
}

impl RunnableConfig {
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn with_step_budget(mut self, budget: StepBudget) -> Self {
        self.step_budget = Some(budget);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}
