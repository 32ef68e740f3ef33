//! Todo data model and the user-facing error taxonomy.
//!
//! Titles are always normalized with [`normalize_title`] before they are sent
//! to the server or compared against an existing title.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Id reserved for the unsaved placeholder shown while a create is in flight.
pub const PLACEHOLDER_ID: i64 = 0;

/// Owner id used when neither the config file nor the CLI provides one.
pub const DEFAULT_OWNER_ID: i64 = 1346;

// ============================================================================
// Wire Types
// ============================================================================

/// A single to-do item as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub owner_id: i64,
}

impl Todo {
    /// Build the transient placeholder displayed during creation.
    pub fn placeholder(title: impl Into<String>, owner_id: i64) -> Self {
        Self {
            id: PLACEHOLDER_ID,
            title: title.into(),
            completed: false,
            owner_id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }
}

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub owner_id: i64,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, owner_id: i64) -> Self {
        Self {
            title: title.into(),
            owner_id,
            completed: false,
        }
    }
}

/// Body of `PATCH /todos/<id>`. All three fields are always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    pub completed: bool,
    pub owner_id: i64,
    pub title: String,
}

impl TodoPatch {
    /// Patch that keeps everything from `todo` except the completion flag.
    pub fn with_completed(todo: &Todo, completed: bool) -> Self {
        Self {
            completed,
            owner_id: todo.owner_id,
            title: todo.title.clone(),
        }
    }

    /// Patch that keeps everything from `todo` except the title.
    pub fn with_title(todo: &Todo, title: impl Into<String>) -> Self {
        Self {
            completed: todo.completed,
            owner_id: todo.owner_id,
            title: title.into(),
        }
    }
}

// ============================================================================
// Title Normalization
// ============================================================================

/// Collapse internal whitespace runs to one space and trim both ends.
///
/// Idempotent: `normalize_title(&normalize_title(s)) == normalize_title(s)`.
/// An all-whitespace input normalizes to the empty string.
pub fn normalize_title(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

// ============================================================================
// User-facing Errors
// ============================================================================

/// Errors shown in the shared error line.
///
/// Every network failure is collapsed into one of these fixed messages; the
/// underlying cause is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("Title should not be empty")]
    TitleEmpty,
    #[error("Unable to add a todo")]
    TodoAdd,
    #[error("Unable to delete a todo")]
    TodoDelete,
    #[error("Todo not found")]
    NotFound,
    #[error("Unable to update a todo")]
    TodoUpdate,
    #[error("Unable to load todos")]
    TodoLoad,
}
