//! One JSON line per processed email.

use serde::{Deserialize, Serialize};

use mailgraph::{EmailState, Memory, RunOutcome, ERROR};

/// Instructions picked for each consumer of the memory lookup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMemories {
    pub response_count: Vec<Memory>,
    pub first_response: Vec<Memory>,
    pub validator: Vec<Memory>,
}

/// Final state of one email run, flattened for the report file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub category: String,
    pub category_id: String,
    pub is_new_category: bool,
    pub current_step: String,
    pub next_step: String,
    pub memories: ReportMemories,
    pub response_count: u32,
    pub first_response: String,
    pub follow_ups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Executor fault behind an error terminal, when the nodes did not report it themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
    /// Steps in the order they ran.
    pub steps: Vec<String>,
}

impl RunReport {
    pub fn from_outcome(outcome: RunOutcome<EmailState>) -> Self {
        let RunOutcome {
            state,
            steps,
            fault,
        } = outcome;
        Self {
            id: state.item_id,
            from: state.from,
            subject: state.subject,
            category: state.category,
            category_id: state.category_id,
            is_new_category: state.is_new_category,
            current_step: state.current_step,
            next_step: state.next_step,
            memories: ReportMemories {
                response_count: state.response_count_memory,
                first_response: state.first_response_memory,
                validator: state.validator_memory,
            },
            response_count: state.response_count,
            first_response: state.first_response,
            follow_ups: state.follow_ups,
            error: Some(state.error).filter(|e| !e.is_empty()),
            fault: fault.map(|f| f.to_string()),
            steps,
        }
    }

    /// Report for an email whose run emitted nothing at all.
    pub fn silent(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_step: ERROR.to_string(),
            error: Some("run produced no steps".to_string()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.current_step == ERROR
    }
}
