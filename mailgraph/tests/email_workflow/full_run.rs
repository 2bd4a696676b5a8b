//! Complete runs through every step of the email workflow.

use std::sync::Arc;

use mailgraph::email::steps;
use mailgraph::{build_email_graph, EmailState, RunnableConfig, END};

use crate::common::{deps, mailbox, scripted_generator};

/// **Scenario**: E1 goes through all steps; memoryMapping serves three actors; follow-ups loop.
#[tokio::test]
async fn full_run_visits_every_step() {
    let mailbox = mailbox();
    let generator = Arc::new(scripted_generator(3));
    let graph = build_email_graph(deps(&mailbox, generator.clone())).unwrap();

    let outcome = graph
        .invoke(EmailState::seed("E1"), RunnableConfig::default())
        .await;

    assert_eq!(
        outcome.steps,
        vec![
            steps::INPUT,
            steps::EMAIL_CATEGORIZER,
            steps::MEMORY_MAPPING,
            steps::NUMBER_OF_RESPONSES,
            steps::MEMORY_MAPPING,
            steps::FIRST_RESPONSE_GENERATOR,
            steps::MEMORY_MAPPING,
            steps::FIRST_RESPONSE_VALIDATOR,
            steps::FOLLOW_UP_GENERATOR,
            steps::FOLLOW_UP_GENERATOR,
        ]
    );
    let state = outcome.state;
    assert_eq!(state.current_step, END);
    assert!(state.error.is_empty(), "{}", state.error);
    assert_eq!(state.category, "Interested");
    assert_eq!(state.category_id, "c1");
    assert!(!state.is_new_category);
    assert_eq!(state.response_count, 3);
    assert_eq!(state.first_response, "The team plan is $20 per seat.");
    assert_eq!(state.follow_ups.len(), 2);
    assert_eq!(state.response_count_memory[0].instruction, "Send two responses when the prospect asks for a price");
    assert_eq!(state.first_response_memory[0].instruction, "Quote the list price");
    assert_eq!(state.validator_memory[0].instruction, "Make sure a price is quoted");
    assert_eq!(state.messages.len(), outcome.steps.len());

    assert_eq!(generator.calls("collect_scenarios"), 3);
    assert!(generator.prompts("write_first_response")[0].contains("Quote the list price"));
    let email = mailbox.email("E1").unwrap();
    assert_eq!(email.category.map(|c| c.name), Some("Interested".to_string()));
}

/// **Scenario**: A single response skips the follow-up loop entirely.
#[tokio::test]
async fn single_response_ends_after_validation() {
    let mailbox = mailbox();
    let graph = build_email_graph(deps(&mailbox, Arc::new(scripted_generator(1)))).unwrap();
    let outcome = graph
        .invoke(EmailState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.steps.last().map(String::as_str), Some(steps::FIRST_RESPONSE_VALIDATOR));
    assert!(outcome.state.follow_ups.is_empty());
    assert_eq!(outcome.state.current_step, END);
}

/// **Scenario**: Seed E1, the input step loads the texts and a stubbed categorizer ends the run:
/// two emissions, category "Non English".
#[tokio::test]
async fn stubbed_categorizer_ends_after_two_emissions() {
    use mailgraph::email::InputNode;
    use mailgraph::{EmailPatch, StateGraph, StatePatch};

    let mailbox = mailbox();
    let mut graph = StateGraph::<EmailState>::new();
    graph
        .add_node(steps::INPUT, Arc::new(InputNode::new(mailbox.clone())))
        .add_fn(steps::EMAIL_CATEGORIZER, |_s: EmailState| async {
            Ok(EmailPatch {
                category: Some("Non English".into()),
                ..EmailPatch::goto(END)
            })
        })
        .set_entry_point(steps::INPUT)
        .add_edge(steps::INPUT, steps::EMAIL_CATEGORIZER);
    let graph = graph.compile().unwrap();

    let outcome = graph
        .invoke(EmailState::seed("E1"), RunnableConfig::default())
        .await;
    assert_eq!(outcome.steps.len(), 2);
    assert_eq!(outcome.state.category, "Non English");
    assert_eq!(outcome.state.current_step, END);
    assert_eq!(outcome.state.reply_text, "Yes, how much is the team plan?");
    assert!(!outcome.state.sent_text.is_empty());
}
