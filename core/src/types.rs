//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the upstream schema but are defined independently from
//! the mock-server crate. Rust field names describe the data; serde renames
//! map them onto the wire names the API actually uses (`_id`, `todo`,
//! `isCompleted`, `createdAt`). Integration tests catch any schema drift.

use serde::{Deserialize, Serialize};

/// A single todo item.
///
/// A todo with an empty `id` is a draft that has not been created yet. Drafts
/// serialize without `_id` so the server assigns one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "todo")]
    pub text: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl Todo {
    /// A not-yet-created todo carrying only its text.
    pub fn draft(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_empty()
    }

    /// Copy of this todo with the completion flag flipped.
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

/// Envelope returned by `GET /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    pub data: Vec<Todo>,
}

/// Error payload the server attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
