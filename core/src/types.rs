//! Domain types for the todo collection.
//!
//! # Design
//! Optional fields use `Option<T>` as the presence marker: `None` means the
//! field was never supplied, `Some` carries a value even when that value is
//! an empty string. A `TodoPatch` therefore distinguishes "leave untouched"
//! from "set to empty" without relying on zero values.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseStatusError;

/// Identifier assigned by the store. Starts at 1 and is never reused.
pub type TodoId = u64;

/// Progress marker of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Created,
    Finished,
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Status::Created),
            "finished" => Ok(Status::Finished),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A single stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Fields supplied by the caller when creating a todo. The id is assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<Status>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
        }
    }

    pub(crate) fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
        }
    }
}

/// Partial update of a todo. Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
}

impl TodoPatch {
    /// Returns true when the patch would leave every field untouched.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Writes the present fields into `todo`.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            todo.status = Some(status);
        }
    }
}
