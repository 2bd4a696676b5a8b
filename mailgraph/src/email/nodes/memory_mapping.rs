//! Memory mapping node: the shared lookup step every generator passes through.
//!
//! Visited once per consumer. The `next_step` hint left by the step that routed here names
//! the consumer, which maps to the actor whose learned instructions are looked up.

use std::sync::Arc;

use async_trait::async_trait;

use crate::email::outputs::{ScenarioSelection, ScenarioValidation};
use crate::email::prompts;
use crate::email::state::{EmailPatch, EmailState, Memory};
use crate::email::steps;
use crate::email::store::InstructionStore;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::{generate_as, StructuredGenerator};

use super::{into_patch, StepError};

/// Logical consumer of a memory lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actor {
    ResponseCount,
    FirstResponse,
    Validator,
    Unknown,
}

impl Actor {
    /// Actor served when the lookup was entered with `next_step` as hint.
    pub fn for_step(next_step: &str) -> Self {
        match next_step {
            steps::NUMBER_OF_RESPONSES => Actor::ResponseCount,
            steps::FIRST_RESPONSE_GENERATOR => Actor::FirstResponse,
            steps::FIRST_RESPONSE_VALIDATOR => Actor::Validator,
            _ => Actor::Unknown,
        }
    }

    /// Name the instruction store keys instructions by.
    pub fn name(self) -> &'static str {
        match self {
            Actor::ResponseCount => "Number of Responses Identifier",
            Actor::FirstResponse => "First Response Generator",
            Actor::Validator => "First Response Validator",
            Actor::Unknown => "Unknown Actor",
        }
    }
}

/// Selects the learned instructions whose scenario clearly occurs in the reply.
///
/// Two generator calls: collect candidate scenarios (skipped without candidates), then
/// validate them. A failed validation counts as "none relevant".
pub struct MemoryMappingNode {
    generator: Arc<dyn StructuredGenerator>,
    instructions: Arc<dyn InstructionStore>,
}

impl MemoryMappingNode {
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        instructions: Arc<dyn InstructionStore>,
    ) -> Self {
        Self {
            generator,
            instructions,
        }
    }

    async fn map(&self, state: &EmailState) -> Result<EmailPatch, StepError> {
        let actor = Actor::for_step(&state.next_step);
        let candidates = self
            .instructions
            .list_instructions(actor.name(), &state.category_id)
            .await?;
        let scenarios: Vec<String> = candidates.iter().map(|i| i.scenario.clone()).collect();

        let collected = if scenarios.is_empty() {
            Vec::new()
        } else {
            generate_as::<ScenarioSelection>(
                self.generator.as_ref(),
                &prompts::collect_scenarios(state, &scenarios),
            )
            .await?
            .scenarios
        };

        let validated = if collected.is_empty() {
            Vec::new()
        } else {
            match generate_as::<ScenarioValidation>(
                self.generator.as_ref(),
                &prompts::validate_scenarios(state, &collected),
            )
            .await
            {
                Ok(answer) => answer.scenarios,
                Err(e) => {
                    tracing::warn!(item_id = %state.item_id, error = %e, "scenario validation failed, using none");
                    Vec::new()
                }
            }
        };

        let selected: Vec<Memory> = candidates
            .into_iter()
            .filter(|i| validated.contains(&i.scenario))
            .map(|i| Memory {
                scenario: i.scenario,
                instruction: i.instruction,
            })
            .collect();

        let line = format!(
            "{}: {} instruction(s) for {}",
            steps::MEMORY_MAPPING,
            selected.len(),
            actor.name()
        );
        let mut patch = EmailPatch {
            selected_memories: Some(selected.clone()),
            ..Default::default()
        };
        match actor {
            Actor::ResponseCount => patch.response_count_memory = Some(selected),
            Actor::FirstResponse => patch.first_response_memory = Some(selected),
            Actor::Validator => patch.validator_memory = Some(selected),
            Actor::Unknown => {}
        }
        Ok(patch.log(line))
    }
}

#[async_trait]
impl Node<EmailState> for MemoryMappingNode {
    async fn run(&self, state: &EmailState) -> Result<EmailPatch, AgentError> {
        Ok(into_patch(steps::MEMORY_MAPPING, self.map(state).await))
    }
}
