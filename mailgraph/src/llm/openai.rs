//! OpenAI Chat Completions client implementing `StructuredGenerator` (ChatOpenAI).
//!
//! Structure is enforced through tool calling: the output schema is sent as the only tool and
//! the model is required to call a tool, so the answer arrives as the call's JSON arguments.
//! Requires `OPENAI_API_KEY` (or explicit config).
//!
//! **Interaction**: Implements `StructuredGenerator`; injected into the email nodes like
//! `MockGenerator`. Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::llm::{OutputSchema, StructuredGenerator};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionObject, ToolChoiceOptions,
    },
    Client,
};

/// OpenAI Chat Completions client constrained to structured answers.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config via
/// `ChatOpenAI::with_config` (custom key or base URL for OpenAI-compatible servers).
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn schema_tool(schema: &OutputSchema) -> ChatCompletionTools {
        ChatCompletionTools::Function(ChatCompletionTool {
            function: FunctionObject {
                name: schema.name.clone(),
                description: Some(schema.description.clone()),
                parameters: Some(schema.schema.clone()),
                ..Default::default()
            },
        })
    }
}

#[async_trait]
impl StructuredGenerator for ChatOpenAI {
    async fn generate(&self, prompt: &str, schema: &OutputSchema) -> Result<Value, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt),
        )]);
        args.tools(vec![Self::schema_tool(schema)]);
        // Only one tool is offered, so "required" pins the answer to the schema.
        args.tool_choice(ChatCompletionToolChoiceOption::Mode(
            ToolChoiceOptions::Required,
        ));
        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })?;

        tracing::debug!(model = %self.model, schema = %schema.name, "structured generation request");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let choice =
            response.choices.into_iter().next().ok_or_else(|| {
                AgentError::ExecutionFailed("OpenAI returned no choices".to_string())
            })?;

        let msg = choice.message;
        let arguments = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .find_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) if f.function.name == schema.name => {
                    Some(f.function.arguments)
                }
                _ => None,
            });

        match arguments {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                AgentError::ExecutionFailed(format!(
                    "OpenAI returned invalid `{}` arguments: {}",
                    schema.name, e
                ))
            }),
            // Some compatible servers ignore tool_choice and answer with plain JSON content.
            None => {
                let content = msg.content.unwrap_or_default();
                serde_json::from_str(content.trim()).map_err(|_| {
                    AgentError::ExecutionFailed(format!(
                        "OpenAI did not call `{}`",
                        schema.name
                    ))
                })
            }
        }
    }
}
