//! Error types for the todo store.
//!
//! `NotFound` carries the id that was looked up so callers can report it.
//! `LockPoisoned` means a previous holder of the store lock panicked; the
//! collection is left as it was and the caller gets an error instead of a
//! second panic.

use crate::types::TodoId;

/// Errors returned by `Store` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No todo with this id exists.
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// The store lock was poisoned by a panicking holder.
    #[error("todo store lock poisoned")]
    LockPoisoned,
}

/// Returned when a string is not one of the known `Status` names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status `{0}`, expected `created` or `finished`")]
pub struct ParseStatusError(pub String);
