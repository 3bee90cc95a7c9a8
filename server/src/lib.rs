//! HTTP JSON API over the in-memory todo store.
//!
//! `app` builds the router around an injected `Store`, `serve` runs it on a
//! listener until a shutdown future resolves and then drains in-flight
//! requests for at most a grace period.

pub mod config;
pub mod error;
pub mod shutdown;

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::Notify};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::{handle_panic, ApiError};

pub use todo_core::{NewTodo, Status, Store, Todo, TodoId, TodoPatch};

pub type SharedStore = Arc<Store>;

/// Body of `POST /todos`.
///
/// A missing title is treated like a blank one. `status` accepts `""`,
/// `"created"` or `"finished"`; the empty string means "not provided".
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl CreateTodo {
    pub fn validate(self) -> Result<NewTodo, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BlankTitle);
        }
        Ok(NewTodo {
            title: self.title,
            description: self.description,
            status: parse_status(self.status)?,
        })
    }
}

/// Body of `PUT /todos/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl UpdateTodo {
    pub fn validate(self) -> Result<TodoPatch, ApiError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ApiError::BlankTitle);
            }
        }
        Ok(TodoPatch {
            title: self.title,
            description: self.description,
            status: parse_status(self.status)?,
        })
    }
}

fn parse_status(raw: Option<String>) -> Result<Option<Status>, ApiError> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.parse::<Status>()?)),
    }
}

pub fn app(store: SharedStore) -> Router {
    let routes = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(store);
    with_middleware(routes)
}

/// Request tracing and panic-to-500 conversion around `router`.
fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Serve `store` on `listener` until `shutdown` resolves.
///
/// After the signal no new connections are accepted. Requests already in
/// flight get up to `grace` to complete; past that the server stops
/// waiting and returns.
pub async fn serve<F>(
    listener: TcpListener,
    store: SharedStore,
    shutdown: F,
    grace: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let drain = Arc::new(Notify::new());
    let drain_started = Arc::clone(&drain);

    let server = axum::serve(listener, app(store))
        .with_graceful_shutdown(async move { drain_started.notified().await })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result,
        () = shutdown => {}
    }

    tracing::info!(?grace, "shutting down, draining in-flight requests");
    drain.notify_one();

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?grace, "grace period elapsed with requests still in flight");
            Ok(())
        }
    }
}

#[tracing::instrument(skip(store))]
async fn list_todos(State(store): State<SharedStore>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(store.get_all()?))
}

#[tracing::instrument(skip(store, payload))]
async fn create_todo(
    State(store): State<SharedStore>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(input) = payload?;
    let todo = store.create(input.validate()?)?;
    tracing::info!(id = todo.id, "todo created");
    Ok(Json(todo))
}

#[tracing::instrument(skip(store))]
async fn get_todo(
    State(store): State<SharedStore>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    Ok(Json(store.get_by_id(id)?))
}

#[tracing::instrument(skip(store, payload))]
async fn update_todo(
    State(store): State<SharedStore>,
    id: Result<Path<TodoId>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let patch = input.validate()?;
    if patch.is_empty() {
        tracing::debug!(id, "update carries no fields");
    }
    let todo = store.update(id, &patch)?;
    tracing::info!(id, "todo updated");
    Ok(Json(todo))
}

#[tracing::instrument(skip(store))]
async fn delete_todo(
    State(store): State<SharedStore>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    let todo = store.delete(id)?;
    tracing::info!(id, "todo deleted");
    Ok(Json(todo))
}
