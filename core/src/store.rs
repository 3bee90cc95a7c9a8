//! In-memory todo store.
//!
//! # Design
//! A single `Mutex` guards both the map and the id counter, so every
//! operation is atomic and all access is serialized. Nothing awaits while
//! the lock is held; callers in async code can call straight in.
//!
//! Ids come from a monotonically increasing counter that is never rewound,
//! so an id freed by `delete` is never handed out again.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

#[derive(Debug)]
struct Inner {
    todos: BTreeMap<TodoId, Todo>,
    next_id: TodoId,
}

/// Owned, thread-safe todo collection.
///
/// Construct one per server (or per test) and share it behind an `Arc`.
#[derive(Debug)]
pub struct Store {
    inner: Mutex<Inner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                todos: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Inserts a new todo under the next free id and returns the stored record.
    pub fn create(&self, new: NewTodo) -> Result<Todo, StoreError> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let todo = new.into_todo(id);
        inner.todos.insert(id, todo.clone());
        tracing::debug!(id, "todo inserted");
        Ok(todo)
    }

    /// Snapshot of every stored todo. Callers must not rely on the order.
    pub fn get_all(&self) -> Result<Vec<Todo>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.todos.values().cloned().collect())
    }

    pub fn get_by_id(&self, id: TodoId) -> Result<Todo, StoreError> {
        let inner = self.lock()?;
        inner.todos.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Applies the present fields of `patch` and returns the updated record.
    pub fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo, StoreError> {
        let mut inner = self.lock()?;
        let todo = inner.todos.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(todo);
        Ok(todo.clone())
    }

    /// Removes a todo and returns it.
    pub fn delete(&self, id: TodoId) -> Result<Todo, StoreError> {
        let mut inner = self.lock()?;
        let removed = inner.todos.remove(&id).ok_or(StoreError::NotFound(id))?;
        tracing::debug!(id, "todo removed");
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.todos.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.todos.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn first_id_is_one() {
        let store = Store::new();
        let todo = store.create(NewTodo::new("first")).unwrap();
        assert_eq!(todo.id, 1);
    }

    #[test]
    fn poisoned_lock_is_reported_not_propagated() {
        let store = Arc::new(Store::new());
        store.create(NewTodo::new("survivor")).unwrap();

        let poisoner = Arc::clone(&store);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(store.get_all(), Err(StoreError::LockPoisoned));
        assert_eq!(
            store.create(NewTodo::new("after")),
            Err(StoreError::LockPoisoned)
        );
        assert_eq!(store.delete(1), Err(StoreError::LockPoisoned));
    }
}
