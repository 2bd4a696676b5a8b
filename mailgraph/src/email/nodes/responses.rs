//! Response nodes: response count, first response, its review, and follow-ups.

use std::sync::Arc;

use async_trait::async_trait;

use crate::email::outputs::{FirstResponse, FollowUp, ResponseCount, ResponseReview};
use crate::email::prompts;
use crate::email::state::{EmailPatch, EmailState};
use crate::email::steps;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::{generate_as, StructuredGenerator};

use super::{into_patch, StepError};

/// Allowed number of responses, first response included.
const MIN_RESPONSES: i64 = 1;
const MAX_RESPONSES: i64 = 4;

/// Decides how many responses to send; the answer is clamped to 1..=4.
pub struct ResponseCountNode {
    generator: Arc<dyn StructuredGenerator>,
}

impl ResponseCountNode {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self { generator }
    }

    async fn count(&self, state: &EmailState) -> Result<EmailPatch, StepError> {
        let answer: ResponseCount =
            generate_as(self.generator.as_ref(), &prompts::count_responses(state)).await?;
        let count = answer.number_of_responses.clamp(MIN_RESPONSES, MAX_RESPONSES) as u32;
        Ok(EmailPatch {
            response_count: Some(count),
            next_step: Some(steps::FIRST_RESPONSE_GENERATOR.to_string()),
            ..Default::default()
        }
        .log(format!("{}: {}", steps::NUMBER_OF_RESPONSES, count)))
    }
}

#[async_trait]
impl Node<EmailState> for ResponseCountNode {
    async fn run(&self, state: &EmailState) -> Result<EmailPatch, AgentError> {
        Ok(into_patch(steps::NUMBER_OF_RESPONSES, self.count(state).await))
    }
}

/// Writes the first response using the instructions selected for it.
pub struct FirstResponseNode {
    generator: Arc<dyn StructuredGenerator>,
}

impl FirstResponseNode {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self { generator }
    }

    async fn write(&self, state: &EmailState) -> Result<EmailPatch, StepError> {
        let answer: FirstResponse =
            generate_as(self.generator.as_ref(), &prompts::first_response(state)).await?;
        if answer.first_response.trim().is_empty() {
            return Err(StepError::EmptyAnswer("firstResponse"));
        }
        Ok(EmailPatch {
            first_response: Some(answer.first_response),
            next_step: Some(steps::FIRST_RESPONSE_VALIDATOR.to_string()),
            ..Default::default()
        }
        .log(format!("{}: drafted", steps::FIRST_RESPONSE_GENERATOR)))
    }
}

#[async_trait]
impl Node<EmailState> for FirstResponseNode {
    async fn run(&self, state: &EmailState) -> Result<EmailPatch, AgentError> {
        Ok(into_patch(steps::FIRST_RESPONSE_GENERATOR, self.write(state).await))
    }
}

/// Reviews the first response; an invalid draft is replaced by the revision.
pub struct ResponseValidatorNode {
    generator: Arc<dyn StructuredGenerator>,
}

impl ResponseValidatorNode {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self { generator }
    }

    async fn review(&self, state: &EmailState) -> Result<EmailPatch, StepError> {
        if state.first_response.is_empty() {
            return Err(StepError::MissingField("firstResponse"));
        }
        let answer: ResponseReview =
            generate_as(self.generator.as_ref(), &prompts::review_first_response(state)).await?;
        let revised = answer.revised_response.trim();
        let mut patch = EmailPatch {
            next_step: Some(steps::FOLLOW_UP_GENERATOR.to_string()),
            ..Default::default()
        };
        let verdict = if answer.is_valid {
            "accepted"
        } else if revised.is_empty() {
            return Err(StepError::EmptyAnswer("revisedResponse"));
        } else {
            patch.first_response = Some(revised.to_string());
            "revised"
        };
        Ok(patch.log(format!("{}: {}", steps::FIRST_RESPONSE_VALIDATOR, verdict)))
    }
}

#[async_trait]
impl Node<EmailState> for ResponseValidatorNode {
    async fn run(&self, state: &EmailState) -> Result<EmailPatch, AgentError> {
        Ok(into_patch(steps::FIRST_RESPONSE_VALIDATOR, self.review(state).await))
    }
}

/// Writes one follow-up per visit; the graph loops back here until enough exist.
pub struct FollowUpNode {
    generator: Arc<dyn StructuredGenerator>,
}

impl FollowUpNode {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self { generator }
    }

    async fn write(&self, state: &EmailState) -> Result<EmailPatch, StepError> {
        if state.follow_ups_missing() == 0 {
            return Ok(EmailPatch::default()
                .log(format!("{}: nothing to write", steps::FOLLOW_UP_GENERATOR)));
        }
        let number = state.follow_ups.len() + 1;
        let answer: FollowUp =
            generate_as(self.generator.as_ref(), &prompts::follow_up(state, number)).await?;
        if answer.follow_up_response.trim().is_empty() {
            return Err(StepError::EmptyAnswer("followUpResponse"));
        }
        let mut follow_ups = state.follow_ups.clone();
        follow_ups.push(answer.follow_up_response);
        Ok(EmailPatch {
            follow_ups: Some(follow_ups),
            next_step: Some(steps::FOLLOW_UP_GENERATOR.to_string()),
            ..Default::default()
        }
        .log(format!("{}: follow-up {}", steps::FOLLOW_UP_GENERATOR, number)))
    }
}

#[async_trait]
impl Node<EmailState> for FollowUpNode {
    async fn run(&self, state: &EmailState) -> Result<EmailPatch, AgentError> {
        Ok(into_patch(steps::FOLLOW_UP_GENERATOR, self.write(state).await))
    }
}
