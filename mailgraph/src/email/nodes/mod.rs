//! Nodes of the email workflow.
//!
//! Every node turns collaborator failures and unusable generator answers into an error patch
//! (`current_step = "error"` plus a message) instead of returning `Err`, so the run ends with
//! the node's own explanation.

mod categorizer;
mod input;
mod memory_mapping;
mod responses;

pub use categorizer::CategorizerNode;
pub use input::InputNode;
pub use memory_mapping::{Actor, MemoryMappingNode};
pub use responses::{FirstResponseNode, FollowUpNode, ResponseCountNode, ResponseValidatorNode};

use thiserror::Error;

use crate::error::AgentError;
use crate::state::StatePatch;

use super::state::EmailPatch;
use super::store::StoreError;

/// Why an email step gave up.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("generator returned an empty `{0}`")]
    EmptyAnswer(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Generation(#[from] AgentError),
}

/// Error patch for a failed step, or the step's patch on success.
pub(crate) fn into_patch(step: &str, result: Result<EmailPatch, StepError>) -> EmailPatch {
    result.unwrap_or_else(|e| {
        tracing::warn!(step, error = %e, "email step failed");
        EmailPatch::failure(format!("{}: {}", step, e)).log(format!("{}: failed", step))
    })
}
