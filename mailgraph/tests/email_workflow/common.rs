//! Fixture mailbox and scripted generator shared by the email workflow tests.

use std::sync::Arc;

use mailgraph::email::EmailDeps;
use mailgraph::{InMemoryMailbox, MockGenerator};
use serde_json::json;

pub const FIXTURE: &str = r#"{
    "emails": [
        {
            "id": "E1",
            "from": "ana@example.com",
            "subject": "Re: pricing",
            "sent_text": "Would you like to see our pricing?",
            "reply_text": "Yes, how much is the team plan?"
        },
        {
            "id": "E2",
            "from": "jo@example.com",
            "subject": "Re: pricing",
            "sent_text": "Would you like to see our pricing?",
            "reply_text": "Pas maintenant, merci."
        }
    ],
    "categories": [
        { "id": "c1", "name": "Interested" }
    ],
    "instructions": [
        {
            "actor": "Number of Responses Identifier",
            "scenario": "asks price",
            "instruction": "Send two responses when the prospect asks for a price",
            "categories": ["c1"]
        },
        {
            "actor": "First Response Generator",
            "scenario": "asks price",
            "instruction": "Quote the list price",
            "categories": ["c1"]
        },
        {
            "actor": "First Response Validator",
            "scenario": "asks price",
            "instruction": "Make sure a price is quoted",
            "categories": ["c1"]
        }
    ]
}"#;

pub fn mailbox() -> Arc<InMemoryMailbox> {
    Arc::new(InMemoryMailbox::from_json_str(FIXTURE).expect("fixture parses"))
}

/// Generator that answers every call of the happy path.
pub fn scripted_generator(response_count: i64) -> MockGenerator {
    MockGenerator::new()
        .with_response(
            "categorize_email",
            json!({"category": "interested", "isNewCategory": false, "explanation": "asks for a price"}),
        )
        .with_response("collect_scenarios", json!({"scenarios": ["asks price"]}))
        .with_response("validate_scenarios", json!({"scenarios": ["asks price"]}))
        .with_response("count_responses", json!({"numberOfResponses": response_count}))
        .with_response("write_first_response", json!({"firstResponse": "The team plan is $20."}))
        .with_response(
            "review_first_response",
            json!({"isValid": false, "revisedResponse": "The team plan is $20 per seat."}),
        )
        .with_response("write_follow_up", json!({"followUpResponse": "Any questions on pricing?"}))
}

pub fn deps(mailbox: &Arc<InMemoryMailbox>, generator: Arc<MockGenerator>) -> EmailDeps {
    EmailDeps::from_mailbox(mailbox.clone(), generator)
}
