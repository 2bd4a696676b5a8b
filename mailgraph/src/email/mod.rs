//! Email-reply workflow built on the graph engine.
//!
//! ```text
//! input → emailCategorizer → memoryMapping ─┬→ numberOfResponsesIdentifier → memoryMapping
//!                                           ├→ firstResponseGenerator      → memoryMapping
//!                                           └→ firstResponseValidator → followUpGenerator* → end
//! ```
//!
//! `memoryMapping` is shared: each consumer leaves its own name in `next_step` before routing
//! back into it, and the conditional edge out of `memoryMapping` follows that hint.
//! `followUpGenerator` loops on itself until `response_count - 1` follow-ups exist.

mod mailbox;
mod nodes;
mod outputs;
mod prompts;
mod state;
mod store;

pub use mailbox::{InMemoryMailbox, MailboxFixture};
pub use nodes::{
    Actor, CategorizerNode, FirstResponseNode, FollowUpNode, InputNode, MemoryMappingNode,
    ResponseCountNode, ResponseValidatorNode, StepError,
};
pub use outputs::{
    Categorization, FirstResponse, FollowUp, ResponseCount, ResponseReview, ScenarioSelection,
    ScenarioValidation,
};
pub use state::{EmailPatch, EmailState, Memory};
pub use store::{
    Category, CategoryStore, EmailRecord, Instruction, InstructionStore, ItemSink, ItemSource,
    ItemUpdate, StoreError,
};

use std::sync::Arc;

use crate::graph::{CompilationError, CompiledStateGraph, StateGraph};
use crate::llm::StructuredGenerator;
use crate::state::{END, ERROR};

/// Step names of the email workflow.
pub mod steps {
    pub const INPUT: &str = "input";
    pub const EMAIL_CATEGORIZER: &str = "emailCategorizer";
    pub const MEMORY_MAPPING: &str = "memoryMapping";
    pub const NUMBER_OF_RESPONSES: &str = "numberOfResponsesIdentifier";
    pub const FIRST_RESPONSE_GENERATOR: &str = "firstResponseGenerator";
    pub const FIRST_RESPONSE_VALIDATOR: &str = "firstResponseValidator";
    pub const FOLLOW_UP_GENERATOR: &str = "followUpGenerator";
}

/// Collaborators injected into the email nodes.
#[derive(Clone)]
pub struct EmailDeps {
    pub source: Arc<dyn ItemSource>,
    pub sink: Arc<dyn ItemSink>,
    pub categories: Arc<dyn CategoryStore>,
    pub instructions: Arc<dyn InstructionStore>,
    pub generator: Arc<dyn StructuredGenerator>,
}

impl EmailDeps {
    /// One mailbox serving all four stores.
    pub fn from_mailbox(
        mailbox: Arc<InMemoryMailbox>,
        generator: Arc<dyn StructuredGenerator>,
    ) -> Self {
        Self {
            source: mailbox.clone(),
            sink: mailbox.clone(),
            categories: mailbox.clone(),
            instructions: mailbox,
            generator,
        }
    }
}

/// Router out of `memoryMapping`: the consumer named by the `next_step` hint.
pub fn route_memory_mapping(state: &EmailState) -> String {
    match state.next_step.as_str() {
        steps::NUMBER_OF_RESPONSES
        | steps::FIRST_RESPONSE_GENERATOR
        | steps::FIRST_RESPONSE_VALIDATOR => state.next_step.clone(),
        _ => ERROR.to_string(),
    }
}

/// Router after the first response is settled: more follow-ups or done.
pub fn route_follow_ups(state: &EmailState) -> String {
    if state.follow_ups_missing() > 0 {
        steps::FOLLOW_UP_GENERATOR.to_string()
    } else {
        END.to_string()
    }
}

/// The email workflow as an uncompiled graph, for callers that attach middleware.
pub fn email_graph(deps: EmailDeps) -> StateGraph<EmailState> {
    let mut graph = StateGraph::<EmailState>::new();
    graph
        .add_node(steps::INPUT, Arc::new(InputNode::new(deps.source)))
        .add_node(
            steps::EMAIL_CATEGORIZER,
            Arc::new(CategorizerNode::new(
                deps.generator.clone(),
                deps.categories,
                deps.sink,
            )),
        )
        .add_node(
            steps::MEMORY_MAPPING,
            Arc::new(MemoryMappingNode::new(
                deps.generator.clone(),
                deps.instructions,
            )),
        )
        .add_node(
            steps::NUMBER_OF_RESPONSES,
            Arc::new(ResponseCountNode::new(deps.generator.clone())),
        )
        .add_node(
            steps::FIRST_RESPONSE_GENERATOR,
            Arc::new(FirstResponseNode::new(deps.generator.clone())),
        )
        .add_node(
            steps::FIRST_RESPONSE_VALIDATOR,
            Arc::new(ResponseValidatorNode::new(deps.generator.clone())),
        )
        .add_node(
            steps::FOLLOW_UP_GENERATOR,
            Arc::new(FollowUpNode::new(deps.generator)),
        )
        .set_entry_point(steps::INPUT)
        .add_edge(steps::INPUT, steps::EMAIL_CATEGORIZER)
        .add_edge(steps::EMAIL_CATEGORIZER, steps::MEMORY_MAPPING)
        .add_conditional_edges(
            steps::MEMORY_MAPPING,
            route_memory_mapping,
            [
                steps::NUMBER_OF_RESPONSES,
                steps::FIRST_RESPONSE_GENERATOR,
                steps::FIRST_RESPONSE_VALIDATOR,
                ERROR,
            ],
        )
        .add_edge(steps::NUMBER_OF_RESPONSES, steps::MEMORY_MAPPING)
        .add_edge(steps::FIRST_RESPONSE_GENERATOR, steps::MEMORY_MAPPING)
        .add_conditional_edges(
            steps::FIRST_RESPONSE_VALIDATOR,
            route_follow_ups,
            [steps::FOLLOW_UP_GENERATOR, END],
        )
        .add_conditional_edges(
            steps::FOLLOW_UP_GENERATOR,
            route_follow_ups,
            [steps::FOLLOW_UP_GENERATOR, END],
        );
    graph
}

/// Compiles the email workflow with the default step budget.
pub fn build_email_graph(
    deps: EmailDeps,
) -> Result<CompiledStateGraph<EmailState>, CompilationError> {
    email_graph(deps).compile()
}
