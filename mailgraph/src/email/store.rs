//! Collaborator interfaces of the email workflow.
//!
//! Emails, categories and learned instructions live outside the engine. The nodes only see
//! these traits, injected as `Arc<dyn …>`; [`InMemoryMailbox`](super::InMemoryMailbox)
//! implements all four.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// An email exchange: the message the user sent and the prospect's reply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub sent_text: String,
    #[serde(default)]
    pub reply_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub categorization_explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A learned instruction, scoped to an actor and a set of categories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub actor: String,
    pub scenario: String,
    pub instruction: String,
    /// Category ids this instruction applies to.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Fields written back onto an email after categorization.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemUpdate {
    pub category: Category,
    pub explanation: String,
}

/// `fetchItem(itemId) -> ItemRecord | NotFound`.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_item(&self, id: &str) -> Result<EmailRecord, StoreError>;
}

/// `patchItem(itemId, fields)`.
#[async_trait]
pub trait ItemSink: Send + Sync {
    async fn patch_item(&self, id: &str, update: ItemUpdate) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Creates a category and returns its id.
    async fn create_category(&self, name: &str) -> Result<String, StoreError>;
}

/// Learned instructions keyed by actor and category id.
#[async_trait]
pub trait InstructionStore: Send + Sync {
    async fn list_instructions(
        &self,
        actor: &str,
        category_id: &str,
    ) -> Result<Vec<Instruction>, StoreError>;
}
