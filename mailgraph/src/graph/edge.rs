//! Edge table: how the next step is chosen after a node ran.
//!
//! Each source step has at most one rule: a static edge or a conditional edge whose router
//! picks among declared targets. Routers are pure functions of the state; one that panics
//! is reported as a configuration fault.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::RunFault;
use crate::state::WorkflowState;

use super::run::panic_message;

/// Pure routing function for a conditional edge.
pub type Router<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Outgoing rule for one step.
pub enum EdgeRule<S> {
    /// Always go to the named step.
    Static(String),
    /// Ask `router`; the answer must be one of `targets`.
    Conditional { router: Router<S>, targets: Vec<String> },
}

impl<S> Clone for EdgeRule<S> {
    fn clone(&self) -> Self {
        match self {
            EdgeRule::Static(to) => EdgeRule::Static(to.clone()),
            EdgeRule::Conditional { router, targets } => EdgeRule::Conditional {
                router: Arc::clone(router),
                targets: targets.clone(),
            },
        }
    }
}

impl<S> EdgeRule<S> {
    /// Every step this rule can resolve to.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            EdgeRule::Static(to) => vec![to.as_str()],
            EdgeRule::Conditional { targets, .. } => targets.iter().map(String::as_str).collect(),
        }
    }
}

/// Validated, immutable edge rules keyed by source step.
pub struct EdgeTable<S> {
    rules: HashMap<String, EdgeRule<S>>,
}

impl<S> Clone for EdgeTable<S> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<S> EdgeTable<S>
where
    S: WorkflowState,
{
    pub(super) fn new(rules: HashMap<String, EdgeRule<S>>) -> Self {
        Self { rules }
    }

    /// `nextStepFor(from, state)`. A missing rule, a panicking router or an undeclared router
    /// answer is a configuration fault.
    pub fn next_step_for(&self, from: &str, state: &S) -> Result<String, RunFault> {
        match self.rules.get(from) {
            Some(EdgeRule::Static(to)) => Ok(to.clone()),
            Some(EdgeRule::Conditional { router, targets }) => {
                let to = catch_unwind(AssertUnwindSafe(|| router(state))).map_err(|payload| {
                    RunFault::Misconfigured(format!(
                        "router for step `{}` panicked: {}",
                        from,
                        panic_message(payload.as_ref())
                    ))
                })?;
                if targets.iter().any(|t| *t == to) {
                    Ok(to)
                } else {
                    Err(RunFault::Misconfigured(format!(
                        "router for step `{}` returned undeclared step `{}`",
                        from, to
                    )))
                }
            }
            None => Err(RunFault::Misconfigured(format!(
                "step `{}` has no outgoing edge",
                from
            ))),
        }
    }

    pub fn has_rule(&self, from: &str) -> bool {
        self.rules.contains_key(from)
    }
}
