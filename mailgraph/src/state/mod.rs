//! Workflow state: one flat record per run, updated only by merging node patches.
//!
//! A state type is declared with [`workflow_state!`](crate::workflow_state), which generates
//! the state struct, its patch struct (every field `Option<T>`), and the merge that applies
//! each field's fixed reducer. The executor only talks to states through [`WorkflowState`]
//! and [`StatePatch`], so it never sees domain fields.

mod reducer;
mod schema;

pub use reducer::{append, replace, Reducer};

use std::fmt::Debug;

/// Sentinel step for successful termination. Has no node.
pub const END: &str = "end";

/// Sentinel step for failed termination. Has no node.
pub const ERROR: &str = "error";

/// Returns true for the two terminal step names.
pub fn is_sentinel(step: &str) -> bool {
    step == END || step == ERROR
}

/// Partial update returned by a node. Absent fields leave the state untouched.
pub trait StatePatch: Clone + Debug + Default + Send + Sync + 'static {
    /// The `current_step` this patch sets, if any. An explicit value beats the edge table.
    fn current_step(&self) -> Option<&str>;

    /// Patch that only moves execution to `step`.
    fn goto(step: impl Into<String>) -> Self;

    /// Patch that routes to the error terminal with `message`.
    fn failure(message: impl Into<String>) -> Self;

    /// The failure message this patch carries, if non-empty.
    fn error(&self) -> Option<&str>;

    /// This patch with its step forced to `"error"` and `message` as the failure.
    fn into_failure(self, message: impl Into<String>) -> Self;
}

/// State threaded through every node of a run.
///
/// Implemented by [`workflow_state!`](crate::workflow_state); the control fields
/// (`item_id`, `current_step`, `next_step`, `error`) exist on every state.
pub trait WorkflowState: Clone + Debug + Default + Send + Sync + 'static {
    type Patch: StatePatch;

    /// Applies each present patch field with that field's reducer. Never fails.
    fn merge_patch(&mut self, patch: &Self::Patch);

    /// Field name and reducer kind, in declaration order. Fixed for the schema's lifetime.
    fn reducers() -> Vec<(&'static str, Reducer)>;

    fn item_id(&self) -> &str;

    fn current_step(&self) -> &str;

    fn set_current_step(&mut self, step: &str);

    fn next_step(&self) -> &str;

    /// The failure message; `None` while it is empty.
    fn error(&self) -> Option<&str>;
}

/// `merge(old, patch) -> new`: the non-mutating form of [`WorkflowState::merge_patch`].
pub fn merge<S: WorkflowState>(old: &S, patch: &S::Patch) -> S {
    let mut next = old.clone();
    next.merge_patch(patch);
    next
}
