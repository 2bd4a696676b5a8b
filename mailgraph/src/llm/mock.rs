//! Mock structured generator for tests and offline runs.
//!
//! Answers are scripted per schema name. Each call pops the next scripted answer; the last one
//! is sticky, so a single scripted answer serves every call for that schema.

use std::collections::VecDeque;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::error::AgentError;

use super::{OutputSchema, StructuredGenerator};

#[derive(Clone, Debug)]
enum Scripted {
    Answer(Value),
    Failure(String),
}

/// Scripted `StructuredGenerator`. Records every prompt it receives per schema name.
///
/// **Interaction**: Injected into the email nodes in tests and by the CLI when no API key is
/// configured.
#[derive(Debug, Default)]
pub struct MockGenerator {
    scripts: DashMap<String, VecDeque<Scripted>>,
    prompts: DashMap<String, Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `answer` for calls with schema `name`.
    pub fn with_response(self, name: impl Into<String>, answer: Value) -> Self {
        self.push(name.into(), Scripted::Answer(answer));
        self
    }

    /// Queues a failing call for schema `name`.
    pub fn with_failure(self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(name.into(), Scripted::Failure(message.into()));
        self
    }

    /// Queues an answer on a shared generator.
    pub fn push_response(&self, name: impl Into<String>, answer: Value) {
        self.push(name.into(), Scripted::Answer(answer));
    }

    fn push(&self, name: String, entry: Scripted) {
        self.scripts.entry(name).or_default().push_back(entry);
    }

    /// Number of calls made with schema `name`.
    pub fn calls(&self, name: &str) -> usize {
        self.prompts.get(name).map(|p| p.len()).unwrap_or(0)
    }

    /// Prompts received for schema `name`, in call order.
    pub fn prompts(&self, name: &str) -> Vec<String> {
        self.prompts
            .get(name)
            .map(|p| p.value().clone())
            .unwrap_or_default()
    }

    fn next_scripted(&self, name: &str) -> Option<Scripted> {
        let mut queue = self.scripts.get_mut(name)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl StructuredGenerator for MockGenerator {
    async fn generate(&self, prompt: &str, schema: &OutputSchema) -> Result<Value, AgentError> {
        self.prompts
            .entry(schema.name.clone())
            .or_default()
            .push(prompt.to_string());

        match self.next_scripted(&schema.name) {
            Some(Scripted::Answer(value)) => Ok(value),
            Some(Scripted::Failure(message)) => Err(AgentError::ExecutionFailed(message)),
            None => Err(AgentError::ExecutionFailed(format!(
                "no scripted response for `{}`",
                schema.name
            ))),
        }
    }
}
