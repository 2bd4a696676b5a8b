//! State of one email-reply run.

use serde::{Deserialize, Serialize};

/// A learned instruction selected for the current email: when `scenario` occurs, follow
/// `instruction`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub scenario: String,
    pub instruction: String,
}

crate::workflow_state! {
    /// Everything the email workflow accumulates about one email.
    ///
    /// `next_step` is the hint the shared `memoryMapping` step reads to know which consumer
    /// it is serving.
    pub struct EmailState, patch EmailPatch {
        replace from: String,
        replace subject: String,
        replace sent_text: String,
        replace reply_text: String,
        replace category: String,
        replace category_id: String,
        replace is_new_category: bool,
        replace explanation: String,
        /// Instructions picked by the most recent memory lookup.
        replace selected_memories: Vec<Memory>,
        replace response_count_memory: Vec<Memory>,
        replace first_response_memory: Vec<Memory>,
        replace validator_memory: Vec<Memory>,
        /// Total responses to send: the first response plus follow-ups, 1..=4.
        replace response_count: u32,
        replace first_response: String,
        replace follow_ups: Vec<String>,
        /// Audit log, one line per step.
        append messages: Vec<String>,
    }
}

impl EmailState {
    /// Follow-ups still to generate.
    pub fn follow_ups_missing(&self) -> usize {
        (self.response_count.saturating_sub(1) as usize).saturating_sub(self.follow_ups.len())
    }
}

impl EmailPatch {
    /// Adds one audit line to the patch.
    pub fn log(mut self, line: impl Into<String>) -> Self {
        self.messages
            .get_or_insert_with(Vec::new)
            .push(line.into());
        self
    }
}
