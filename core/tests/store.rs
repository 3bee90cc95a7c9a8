//! Behavioural tests for the in-memory store.
//!
//! Results of `get_all` are compared as sets of ids, never by position.

use std::collections::HashSet;
use std::sync::Arc;

use todo_core::{NewTodo, Status, Store, StoreError, TodoPatch};

fn ids(store: &Store) -> HashSet<u64> {
    store.get_all().unwrap().into_iter().map(|t| t.id).collect()
}

#[test]
fn create_returns_strictly_increasing_ids() {
    let store = Store::new();
    let mut last = 0;
    for n in 0..10 {
        let todo = store.create(NewTodo::new(format!("task {n}"))).unwrap();
        assert!(todo.id > last, "id {} not greater than {last}", todo.id);
        last = todo.id;
    }
}

#[test]
fn create_stores_optional_fields_as_given() {
    let store = Store::new();
    let todo = store
        .create(NewTodo {
            title: "Learn Rust".to_string(),
            description: Some(String::new()),
            status: Some(Status::Created),
        })
        .unwrap();

    let fetched = store.get_by_id(todo.id).unwrap();
    assert_eq!(fetched.title, "Learn Rust");
    assert_eq!(fetched.description.as_deref(), Some(""));
    assert_eq!(fetched.status, Some(Status::Created));

    let bare = store.create(NewTodo::new("no extras")).unwrap();
    assert_eq!(bare.description, None);
    assert_eq!(bare.status, None);
}

#[test]
fn get_all_returns_every_created_todo() {
    let store = Store::new();
    assert!(store.get_all().unwrap().is_empty());
    assert!(store.is_empty().unwrap());

    let created: HashSet<u64> = (0..5)
        .map(|n| store.create(NewTodo::new(format!("t{n}"))).unwrap().id)
        .collect();

    assert_eq!(store.len().unwrap(), 5);
    assert_eq!(ids(&store), created);
}

#[test]
fn get_by_id_after_delete_is_not_found() {
    let store = Store::new();
    let todo = store.create(NewTodo::new("short lived")).unwrap();

    store.delete(todo.id).unwrap();
    assert_eq!(store.get_by_id(todo.id), Err(StoreError::NotFound(todo.id)));
}

#[test]
fn status_only_update_leaves_other_fields() {
    let store = Store::new();
    let todo = store
        .create(NewTodo {
            description: Some("semi-skimmed".to_string()),
            ..NewTodo::new("Buy milk")
        })
        .unwrap();

    let patch = TodoPatch {
        status: Some(Status::Finished),
        ..TodoPatch::default()
    };
    let updated = store.update(todo.id, &patch).unwrap();
    assert_eq!(updated.status, Some(Status::Finished));

    let fetched = store.get_by_id(todo.id).unwrap();
    assert_eq!(fetched.title, "Buy milk");
    assert_eq!(fetched.description.as_deref(), Some("semi-skimmed"));
    assert_eq!(fetched.status, Some(Status::Finished));
}

#[test]
fn update_unknown_id_is_not_found_and_creates_nothing() {
    let store = Store::new();
    let patch = TodoPatch {
        title: Some("ghost".to_string()),
        ..TodoPatch::default()
    };

    assert_eq!(store.update(42, &patch), Err(StoreError::NotFound(42)));
    assert!(store.is_empty().unwrap());
}

#[test]
fn delete_twice_fails_the_second_time() {
    let store = Store::new();
    let todo = store.create(NewTodo::new("once")).unwrap();

    assert_eq!(store.delete(todo.id).unwrap(), todo);
    assert_eq!(store.delete(todo.id), Err(StoreError::NotFound(todo.id)));
}

#[test]
fn ids_are_not_reused_after_delete() {
    let store = Store::new();
    let a = store.create(NewTodo::new("a")).unwrap();
    let b = store.create(NewTodo::new("b")).unwrap();
    store.delete(a.id).unwrap();
    store.delete(b.id).unwrap();

    let c = store.create(NewTodo::new("c")).unwrap();
    assert_eq!(c.id, 3);
}

#[test]
fn concurrent_creates_get_unique_ids() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 50;

    let store = Arc::new(Store::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|n| store.create(NewTodo::new(format!("{t}-{n}"))).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "id {id} handed out twice");
        }
    }

    let expected: HashSet<u64> = (1..=THREADS * PER_THREAD).collect();
    assert_eq!(seen, expected);
    assert_eq!(ids(&store), expected);
}
