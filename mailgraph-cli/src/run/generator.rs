//! Picks the structured generator for a batch: OpenAI when configured, scripted otherwise.

use std::sync::Arc;

use serde_json::json;

use mailgraph::{MockGenerator, StructuredGenerator};

use crate::config::RunConfig;

/// Scripted answers for offline runs: every email lands in one category, gets one
/// follow-up, and no learned instruction is selected.
pub fn scripted_generator() -> MockGenerator {
    MockGenerator::new()
        .with_response(
            "categorize_email",
            json!({
                "category": "Uncategorized",
                "isNewCategory": true,
                "explanation": "scripted run without a language model"
            }),
        )
        .with_response("collect_scenarios", json!({ "scenarios": [] }))
        .with_response("validate_scenarios", json!({ "scenarios": [] }))
        .with_response("count_responses", json!({ "numberOfResponses": 2 }))
        .with_response(
            "write_first_response",
            json!({ "firstResponse": "Thanks for getting back to us. We will follow up shortly." }),
        )
        .with_response(
            "review_first_response",
            json!({ "isValid": true, "revisedResponse": "" }),
        )
        .with_response(
            "write_follow_up",
            json!({ "followUpResponse": "Just checking in on our previous message." }),
        )
}

/// Generator used by every run of the batch.
pub fn build_generator(config: &RunConfig) -> Arc<dyn StructuredGenerator> {
    match openai_generator(config) {
        Some(generator) => generator,
        None => {
            tracing::info!("using scripted generator");
            Arc::new(scripted_generator())
        }
    }
}

#[cfg(feature = "openai")]
fn openai_generator(config: &RunConfig) -> Option<Arc<dyn StructuredGenerator>> {
    use async_openai::config::OpenAIConfig;
    use mailgraph::ChatOpenAI;

    if !config.uses_openai() {
        return None;
    }
    let api_key = config.api_key.clone()?;
    let openai_config = OpenAIConfig::new()
        .with_api_base(&config.api_base)
        .with_api_key(api_key);
    tracing::info!(model = %config.model, api_base = %config.api_base, "using OpenAI generator");
    let llm = ChatOpenAI::with_config(openai_config, config.model.clone())
        .with_temperature(config.temperature);
    Some(Arc::new(llm))
}

#[cfg(not(feature = "openai"))]
fn openai_generator(_config: &RunConfig) -> Option<Arc<dyn StructuredGenerator>> {
    None
}
