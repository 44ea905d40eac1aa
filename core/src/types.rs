//! Domain records for the todo store.
//!
//! # Design
//! These types mirror the store's persisted schema but are defined
//! independently of the mock-store crate. Integration tests and the JSON
//! test vectors catch any schema drift between the two.
//!
//! Field names follow the store's camelCase wire format. `description` and
//! `dueDate` are always present on records read back from the store (empty
//! string when unset), but optional on input payloads.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InputError;

/// Completion state of a todo. Exactly one of the two at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "onProgress")]
    OnProgress,
    Completed,
}

impl Status {
    /// The other status. Toggling twice is the identity.
    pub fn toggled(self) -> Self {
        match self {
            Status::OnProgress => Status::Completed,
            Status::Completed => Status::OnProgress,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Status::Completed
    }
}

/// A single todo as held by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    pub status: Status,
    pub order: i64,
    pub created_at: i64,
}

impl Todo {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be trimmed and lower-cased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

/// Total display order: `order`, then `created_at`, then `id`.
pub fn canonical_cmp(a: &Todo, b: &Todo) -> Ordering {
    a.order
        .cmp(&b.order)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

/// Sort a snapshot into display order (ascending by `order`).
pub fn sort_canonical(todos: &mut [Todo]) {
    todos.sort_by(canonical_cmp);
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl NewTodo {
    /// Build a create payload from raw form input.
    ///
    /// The title falls back to the description when blank; in that case the
    /// description is consumed by the title and not repeated.
    pub fn from_input(title: &str, description: &str, due_date: &str) -> Result<Self, InputError> {
        let (text, description, due_date) = normalize_fields(title, description, due_date)?;
        Ok(Self {
            text,
            description,
            due_date,
        })
    }
}

/// Request payload for overwriting a todo's editable fields. Status and
/// order are never touched by an edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoEdit {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TodoEdit {
    /// Same normalization rules as [`NewTodo::from_input`].
    pub fn from_input(title: &str, description: &str, due_date: &str) -> Result<Self, InputError> {
        let (text, description, due_date) = normalize_fields(title, description, due_date)?;
        Ok(Self {
            text,
            description,
            due_date,
        })
    }
}

fn normalize_fields(
    title: &str,
    description: &str,
    due_date: &str,
) -> Result<(String, Option<String>, Option<String>), InputError> {
    let title = title.trim();
    let description = description.trim();
    let due_date = due_date.trim();

    let (text, description) = match (title.is_empty(), description.is_empty()) {
        (true, true) => return Err(InputError::EmptyTodo),
        (true, false) => (description, None),
        (false, true) => (title, None),
        (false, false) => (title, Some(description.to_string())),
    };
    let due_date = (!due_date.is_empty()).then(|| due_date.to_string());
    Ok((text.to_string(), description, due_date))
}

/// One absolute order assignment inside a reorder batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub order: i64,
}

/// Request payload for a reorder batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderTodos {
    pub updates: Vec<OrderUpdate>,
}

/// Response body of a successful create.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created {
    pub id: Uuid,
}

/// Response body of a delete-completed call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub deleted: usize,
}

/// A versioned copy of the whole collection, as delivered by the watch
/// endpoint. `version` increases with every committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u64,
    pub todos: Vec<Todo>,
}
