//! In-memory mailbox: emails, categories and learned instructions behind the four
//! collaborator traits.
//!
//! Backed by `DashMap` so one mailbox can serve many concurrent runs. Listing keeps
//! insertion order. Loadable from a JSON fixture.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::store::{
    Category, CategoryStore, EmailRecord, Instruction, InstructionStore, ItemSink, ItemSource,
    ItemUpdate, StoreError,
};

/// Serialized mailbox contents.
///
/// ```json
/// { "emails": [{ "id": "E1", "reply_text": "..." }], "categories": [], "instructions": [] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MailboxFixture {
    #[serde(default)]
    pub emails: Vec<EmailRecord>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// In-memory implementation of `ItemSource`, `ItemSink`, `CategoryStore` and
/// `InstructionStore`.
#[derive(Debug, Default)]
pub struct InMemoryMailbox {
    emails: DashMap<String, (usize, EmailRecord)>,
    categories: DashMap<String, (usize, Category)>,
    /// Lowercased category name to id; makes `create_category` atomic per name.
    category_names: DashMap<String, String>,
    instructions: DashMap<usize, Instruction>,
    seq: AtomicUsize,
}

impl InMemoryMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: MailboxFixture) -> Self {
        let mailbox = Self::new();
        for email in fixture.emails {
            mailbox.insert_email(email);
        }
        for category in fixture.categories {
            mailbox.insert_category(category);
        }
        for instruction in fixture.instructions {
            mailbox.insert_instruction(instruction);
        }
        mailbox
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let fixture: MailboxFixture =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Self::from_fixture(fixture))
    }

    /// Reads a JSON fixture file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }

    fn next_seq(&self) -> usize {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Inserts or replaces an email.
    pub fn insert_email(&self, email: EmailRecord) {
        let seq = self.next_seq();
        self.emails.insert(email.id.clone(), (seq, email));
    }

    pub fn insert_category(&self, category: Category) {
        let seq = self.next_seq();
        self.category_names
            .insert(category.name.to_ascii_lowercase(), category.id.clone());
        self.categories.insert(category.id.clone(), (seq, category));
    }

    pub fn insert_instruction(&self, instruction: Instruction) {
        let seq = self.next_seq();
        self.instructions.insert(seq, instruction);
    }

    pub fn email(&self, id: &str) -> Option<EmailRecord> {
        self.emails.get(id).map(|e| e.value().1.clone())
    }

    /// Email ids in insertion order.
    pub fn email_ids(&self) -> Vec<String> {
        let mut ids: Vec<(usize, String)> = self
            .emails
            .iter()
            .map(|e| (e.value().0, e.key().clone()))
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Current contents, in insertion order.
    pub fn snapshot(&self) -> MailboxFixture {
        let mut emails: Vec<(usize, EmailRecord)> =
            self.emails.iter().map(|e| e.value().clone()).collect();
        emails.sort_by_key(|(seq, _)| *seq);
        let mut instructions: Vec<(usize, Instruction)> = self
            .instructions
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        instructions.sort_by_key(|(seq, _)| *seq);
        MailboxFixture {
            emails: emails.into_iter().map(|(_, e)| e).collect(),
            categories: self.ordered_categories(),
            instructions: instructions.into_iter().map(|(_, i)| i).collect(),
        }
    }

    fn ordered_categories(&self) -> Vec<Category> {
        let mut categories: Vec<(usize, Category)> =
            self.categories.iter().map(|e| e.value().clone()).collect();
        categories.sort_by_key(|(seq, _)| *seq);
        categories.into_iter().map(|(_, c)| c).collect()
    }
}

#[async_trait]
impl ItemSource for InMemoryMailbox {
    async fn fetch_item(&self, id: &str) -> Result<EmailRecord, StoreError> {
        self.email(id).ok_or_else(|| StoreError::NotFound {
            kind: "email",
            id: id.to_string(),
        })
    }
}

#[async_trait]
impl ItemSink for InMemoryMailbox {
    async fn patch_item(&self, id: &str, update: ItemUpdate) -> Result<(), StoreError> {
        let mut entry = self.emails.get_mut(id).ok_or_else(|| StoreError::NotFound {
            kind: "email",
            id: id.to_string(),
        })?;
        let email = &mut entry.value_mut().1;
        email.category = Some(update.category);
        email.categorization_explanation = update.explanation;
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for InMemoryMailbox {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.ordered_categories())
    }

    /// Returns the existing id when a category with the same name (any case) exists.
    async fn create_category(&self, name: &str) -> Result<String, StoreError> {
        match self.category_names.entry(name.to_ascii_lowercase()) {
            Entry::Occupied(existing) => Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                let (seq, id) = loop {
                    let seq = self.next_seq();
                    let id = format!("cat-{}", seq);
                    if !self.categories.contains_key(&id) {
                        break (seq, id);
                    }
                };
                self.categories.insert(
                    id.clone(),
                    (
                        seq,
                        Category {
                            id: id.clone(),
                            name: name.to_string(),
                        },
                    ),
                );
                slot.insert(id.clone());
                Ok(id)
            }
        }
    }
}

#[async_trait]
impl InstructionStore for InMemoryMailbox {
    async fn list_instructions(
        &self,
        actor: &str,
        category_id: &str,
    ) -> Result<Vec<Instruction>, StoreError> {
        let mut matching: Vec<(usize, Instruction)> = self
            .instructions
            .iter()
            .filter(|e| {
                let i = e.value();
                i.actor == actor && i.categories.iter().any(|c| c == category_id)
            })
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        matching.sort_by_key(|(seq, _)| *seq);
        Ok(matching.into_iter().map(|(_, i)| i).collect())
    }
}
