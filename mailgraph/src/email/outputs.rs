//! Answer shapes the email nodes request from the structured generator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::llm::StructuredOutput;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Categorization {
    /// The selected or suggested category name.
    pub category: String,
    /// Whether this is a new category or an existing one.
    pub is_new_category: bool,
    /// A brief explanation of why this category was chosen.
    pub explanation: String,
}

impl StructuredOutput for Categorization {
    const NAME: &'static str = "categorize_email";
    const DESCRIPTION: &'static str = "Categorize the email based on its content";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioSelection {
    pub scenarios: Vec<String>,
}

impl StructuredOutput for ScenarioSelection {
    const NAME: &'static str = "collect_scenarios";
    const DESCRIPTION: &'static str = "Collect relevant scenarios based on email content";
}

/// Second opinion on collected scenarios. Same shape as [`ScenarioSelection`], separate
/// schema name so the two calls can be told apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioValidation {
    pub scenarios: Vec<String>,
}

impl StructuredOutput for ScenarioValidation {
    const NAME: &'static str = "validate_scenarios";
    const DESCRIPTION: &'static str = "Keep only scenarios clearly required to answer the reply";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCount {
    pub number_of_responses: i64,
}

impl StructuredOutput for ResponseCount {
    const NAME: &'static str = "count_responses";
    const DESCRIPTION: &'static str = "Number of responses to send, first response included";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FirstResponse {
    pub first_response: String,
}

impl StructuredOutput for FirstResponse {
    const NAME: &'static str = "write_first_response";
    const DESCRIPTION: &'static str = "The response to the prospect's reply";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReview {
    pub is_valid: bool,
    /// Corrected response; only read when `is_valid` is false.
    #[serde(default)]
    pub revised_response: String,
}

impl StructuredOutput for ResponseReview {
    const NAME: &'static str = "review_first_response";
    const DESCRIPTION: &'static str = "Check the first response and revise it if needed";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub follow_up_response: String,
}

impl StructuredOutput for FollowUp {
    const NAME: &'static str = "write_follow_up";
    const DESCRIPTION: &'static str = "The next follow-up email";
}
