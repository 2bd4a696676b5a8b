//! Structured generation: a text-generation call constrained to return a declared shape.
//!
//! Nodes describe the answer they want with an [`OutputSchema`] (a JSON Schema derived from a
//! Rust type via `schemars`) and get back a `serde_json::Value`. [`generate_as`] does the
//! round trip for a [`StructuredOutput`] type and turns a malformed answer into an
//! `AgentError`, which nodes convert into an error patch.

mod mock;
#[cfg(feature = "openai")]
mod openai;

pub use mock::MockGenerator;
#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AgentError;

/// Shape the generator must answer in: a named JSON Schema object.
///
/// `name` doubles as the function/tool name for providers that enforce structure through
/// tool calling, and as the script key for [`MockGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

impl OutputSchema {
    /// Derives the schema from `T`'s `JsonSchema` implementation.
    pub fn of<T: JsonSchema>(name: impl Into<String>, description: impl Into<String>) -> Self {
        let root = schemars::schema_for!(T);
        let schema = serde_json::to_value(root)
            .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }
}

/// A Rust type a generator can be asked to produce.
///
/// ```rust
/// use mailgraph::StructuredOutput;
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct Verdict { ok: bool }
///
/// impl StructuredOutput for Verdict {
///     const NAME: &'static str = "give_verdict";
///     const DESCRIPTION: &'static str = "Say whether the text is fine";
/// }
///
/// assert_eq!(Verdict::output_schema().name, "give_verdict");
/// ```
pub trait StructuredOutput: DeserializeOwned + JsonSchema + Send {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn output_schema() -> OutputSchema {
        OutputSchema::of::<Self>(Self::NAME, Self::DESCRIPTION)
    }
}

/// Structured generation service: `generate(prompt, schema) -> parsed object`.
///
/// Implementations: [`MockGenerator`] (scripted answers for tests), `ChatOpenAI`
/// (feature `openai`). Injected into nodes as `Arc<dyn StructuredGenerator>`.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// One call. The returned value is expected, not guaranteed, to match `schema`.
    async fn generate(&self, prompt: &str, schema: &OutputSchema) -> Result<Value, AgentError>;
}

/// Asks `generator` for a `T` and deserializes the answer.
///
/// A value that does not fit `T` (missing fields, wrong types, null) is an error.
pub async fn generate_as<T>(generator: &dyn StructuredGenerator, prompt: &str) -> Result<T, AgentError>
where
    T: StructuredOutput,
{
    let schema = T::output_schema();
    let value = generator.generate(prompt, &schema).await?;
    serde_json::from_value(value).map_err(|e| {
        AgentError::ExecutionFailed(format!("malformed `{}` output: {}", schema.name, e))
    })
}
