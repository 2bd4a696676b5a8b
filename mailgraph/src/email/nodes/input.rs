//! Input node: loads the email named by `item_id` into the state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::email::state::{EmailPatch, EmailState};
use crate::email::steps;
use crate::email::store::ItemSource;
use crate::error::AgentError;
use crate::graph::Node;

use super::{into_patch, StepError};

/// Fetches the email and fills `from`, `subject`, `sent_text` and `reply_text`.
pub struct InputNode {
    source: Arc<dyn ItemSource>,
}

impl InputNode {
    pub fn new(source: Arc<dyn ItemSource>) -> Self {
        Self { source }
    }

    async fn load(&self, state: &EmailState) -> Result<EmailPatch, StepError> {
        if state.item_id.is_empty() {
            return Err(StepError::MissingField("itemId"));
        }
        let email = self.source.fetch_item(&state.item_id).await?;
        Ok(EmailPatch {
            from: Some(email.from),
            subject: Some(email.subject),
            sent_text: Some(email.sent_text),
            reply_text: Some(email.reply_text),
            ..Default::default()
        }
        .log(format!("{}: loaded email {}", steps::INPUT, email.id)))
    }
}

#[async_trait]
impl Node<EmailState> for InputNode {
    async fn run(&self, state: &EmailState) -> Result<EmailPatch, AgentError> {
        Ok(into_patch(steps::INPUT, self.load(state).await))
    }
}
