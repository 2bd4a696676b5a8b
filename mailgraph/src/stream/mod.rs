//! Streaming types for graph runs.
//!
//! A run is observed as a sequence of [`StepEvent`]s, one per executed step (plus one for a
//! synthetic fault). [`RunOutcome`] is the folded form returned by `CompiledStateGraph::invoke`.

use async_trait::async_trait;
use futures::{Stream, StreamExt};

use crate::error::RunFault;
use crate::state::{WorkflowState, END, ERROR};

/// One emission of a run: the step that ran, its delta, and the merged state.
#[derive(Clone, Debug)]
pub struct StepEvent<S>
where
    S: WorkflowState,
{
    /// Step that was executed (or attempted, for synthetic faults).
    pub step: String,
    /// Patch applied at this step. For synthetic faults, the failure patch the executor applied.
    pub update: S::Patch,
    /// State after the merge; `current_step` already names the step that runs next.
    pub state: S,
    /// Set when the executor, not the node, put the run into `"error"`.
    pub fault: Option<RunFault>,
}

impl<S> StepEvent<S>
where
    S: WorkflowState,
{
    /// True when this is the last event of the run.
    pub fn is_terminal(&self) -> bool {
        self.is_end() || self.is_error()
    }

    pub fn is_end(&self) -> bool {
        self.state.current_step() == END
    }

    pub fn is_error(&self) -> bool {
        self.state.current_step() == ERROR
    }
}

/// Final state of a run plus the steps it went through.
#[derive(Clone, Debug)]
pub struct RunOutcome<S>
where
    S: WorkflowState,
{
    pub state: S,
    /// Step names in emission order; revisited steps appear once per visit.
    pub steps: Vec<String>,
    /// The executor fault that ended the run, if any.
    pub fault: Option<RunFault>,
}

impl<S> RunOutcome<S>
where
    S: WorkflowState,
{
    pub fn is_error(&self) -> bool {
        self.state.current_step() == ERROR
    }

    /// Number of times `step` was emitted.
    pub fn visits(&self, step: &str) -> usize {
        self.steps.iter().filter(|s| *s == step).count()
    }
}

/// Folds a stream of step events the way a driver usually does.
///
/// Implemented for every `Send` stream of `StepEvent<S>`, including
/// `CompiledStateGraph::stream` and `CompiledStateGraph::steps`.
#[async_trait]
pub trait StepStreamExt<S>: Stream<Item = StepEvent<S>> + Sized + Send
where
    S: WorkflowState,
{
    /// State carried by the last event, or `None` when the run emitted nothing.
    async fn final_state(self) -> Option<S> {
        self.fold(None, |_, event| async move { Some(event.state) })
            .await
    }

    /// Consumes the stream into a `RunOutcome`; `None` when the run emitted nothing.
    async fn into_outcome(self) -> Option<RunOutcome<S>> {
        self.fold(None, |acc: Option<RunOutcome<S>>, event| async move {
            let mut steps = acc.map(|o| o.steps).unwrap_or_default();
            steps.push(event.step);
            Some(RunOutcome {
                state: event.state,
                steps,
                fault: event.fault,
            })
        })
        .await
    }
}

impl<S, T> StepStreamExt<S> for T
where
    S: WorkflowState,
    T: Stream<Item = StepEvent<S>> + Send,
{
}
