//! Error types shared by nodes and the graph executor.
//!
//! `AgentError` is what a node may return instead of a patch; the executor never lets it
//! escape a run. `RunFault` is the typed reason behind every synthetic `"error"` terminal;
//! its `Display` text is written into the state's `error` field.

use thiserror::Error;

/// Node execution error.
///
/// Returned by `Node::run` when a step fails without producing an error patch of its own.
/// The executor converts it into a `RunFault::NodeFailed` terminal.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. generation call failed, store error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

/// Why a run ended in the `"error"` sentinel without a node asking for it.
///
/// The `Display` output carries stable markers (`graph misconfigured`, `step budget exceeded`)
/// so monitoring can tell configuration faults apart from business failures by text alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunFault {
    /// A required seed field was empty when the run started.
    #[error("input fault: missing required seed field `{field}`")]
    MissingInput { field: &'static str },

    /// The node returned `Err` instead of a patch.
    #[error("node `{step}` failed: {message}")]
    NodeFailed { step: String, message: String },

    /// The node future panicked.
    #[error("node `{step}` panicked: {message}")]
    NodePanicked { step: String, message: String },

    /// The node asked for the error terminal but left no message.
    #[error("node `{step}` routed to error without a message")]
    SilentError { step: String },

    /// Unknown step, undeclared router target, or missing edge rule.
    #[error("graph misconfigured: {0}")]
    Misconfigured(String),

    /// More node invocations were attempted than the run's budget allows.
    #[error("step budget exceeded: {budget} node invocations")]
    BudgetExceeded { budget: usize },

    /// The run's cancellation token fired.
    #[error("run cancelled before step `{step}` completed")]
    Cancelled { step: String },

    /// The run's deadline passed.
    #[error("run timed out before step `{step}` completed")]
    TimedOut { step: String },
}

impl RunFault {
    /// True for faults caused by the graph definition rather than a node's own logic.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RunFault::Misconfigured(_))
    }
}
