//! In-memory todo collection.
//!
//! # Overview
//! `Store` owns every todo record and serializes access behind one lock.
//! Records are created from a `NewTodo`, mutated through a `TodoPatch` that
//! only touches the fields it carries, and removed by id. Ids are assigned
//! by the store, start at 1 and are never reused.
//!
//! # Design
//! - The store is a plain value; whoever needs one constructs it and passes
//!   it on. There is no global instance.
//! - Reads return cloned snapshots, so no reference into the collection
//!   outlives a call.
//! - Title validation is the caller's job; the store accepts whatever it is
//!   given.

pub mod error;
pub mod store;
pub mod types;

pub use error::{ParseStatusError, StoreError};
pub use store::Store;
pub use types::{NewTodo, Status, Todo, TodoId, TodoPatch};
