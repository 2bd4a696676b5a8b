//! Categorizer node: picks or creates the email's category and writes it back to the email.

use std::sync::Arc;

use async_trait::async_trait;

use crate::email::outputs::Categorization;
use crate::email::prompts;
use crate::email::state::{EmailPatch, EmailState};
use crate::email::steps;
use crate::email::store::{Category, CategoryStore, ItemSink, ItemUpdate};
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::{generate_as, StructuredGenerator};

use super::{into_patch, StepError};

/// Asks the generator for `{category, isNewCategory, explanation}`, matches the answer
/// case-insensitively against the existing categories and creates the category when missing.
///
/// Leaves `next_step = numberOfResponsesIdentifier` for the memory lookup that follows.
pub struct CategorizerNode {
    generator: Arc<dyn StructuredGenerator>,
    categories: Arc<dyn CategoryStore>,
    sink: Arc<dyn ItemSink>,
}

impl CategorizerNode {
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        categories: Arc<dyn CategoryStore>,
        sink: Arc<dyn ItemSink>,
    ) -> Self {
        Self {
            generator,
            categories,
            sink,
        }
    }

    async fn categorize(&self, state: &EmailState) -> Result<EmailPatch, StepError> {
        if state.item_id.is_empty() {
            return Err(StepError::MissingField("itemId"));
        }
        let existing = self.categories.list_categories().await?;
        let names: Vec<String> = existing.iter().map(|c| c.name.clone()).collect();

        let answer: Categorization = generate_as(
            self.generator.as_ref(),
            &prompts::categorize(state, &names),
        )
        .await?;
        let name = answer.category.trim();
        if name.is_empty() {
            return Err(StepError::EmptyAnswer("category"));
        }

        // The model's isNewCategory flag is advisory; the store decides.
        let (category, is_new) = match existing
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
        {
            Some(found) => (found.clone(), false),
            None => {
                let id = self.categories.create_category(name).await?;
                tracing::info!(item_id = %state.item_id, category = name, %id, "created category");
                (
                    Category {
                        id,
                        name: name.to_string(),
                    },
                    true,
                )
            }
        };

        self.sink
            .patch_item(
                &state.item_id,
                ItemUpdate {
                    category: category.clone(),
                    explanation: answer.explanation.clone(),
                },
            )
            .await?;

        let line = format!(
            "{}: {}{}",
            steps::EMAIL_CATEGORIZER,
            category.name,
            if is_new { " (new)" } else { "" }
        );
        Ok(EmailPatch {
            category: Some(category.name),
            category_id: Some(category.id),
            is_new_category: Some(is_new),
            explanation: Some(answer.explanation),
            next_step: Some(steps::NUMBER_OF_RESPONSES.to_string()),
            ..Default::default()
        }
        .log(line))
    }
}

#[async_trait]
impl Node<EmailState> for CategorizerNode {
    async fn run(&self, state: &EmailState) -> Result<EmailPatch, AgentError> {
        Ok(into_patch(steps::EMAIL_CATEGORIZER, self.categorize(state).await))
    }
}
