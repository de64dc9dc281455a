use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub todo: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Body accepted by both create and update. Identity fields sent by clients
/// are ignored.
#[derive(Deserialize)]
pub struct TodoInput {
    pub todo: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

#[derive(Serialize, Deserialize)]
pub struct TodoList {
    pub data: Vec<Todo>,
}

#[derive(Deserialize)]
pub struct Search {
    pub q: Option<String>,
}

/// Error answered as `{"error": message}` with the given status.
#[derive(Debug)]
pub struct ApiFailure(pub StatusCode, pub &'static str);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

/// Insertion-ordered store.
pub type Db = Arc<RwLock<Vec<Todo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/todos", get(list_todos))
        .route("/todo", post(create_todo))
        .route("/todo/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>, Query(search): Query<Search>) -> Json<TodoList> {
    let todos = db.read().await;
    let needle = search.q.unwrap_or_default().to_lowercase();
    let data = todos
        .iter()
        .filter(|todo| todo.todo.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(TodoList { data })
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), ApiFailure> {
    if input.todo.trim().is_empty() {
        return Err(ApiFailure(StatusCode::BAD_REQUEST, "Todo text is required"));
    }
    let todo = Todo {
        id: Uuid::new_v4().simple().to_string(),
        todo: input.todo,
        is_completed: input.is_completed,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    tracing::info!(id = %todo.id, "created todo");
    db.write().await.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<TodoInput>,
) -> Result<Json<Todo>, ApiFailure> {
    if input.todo.trim().is_empty() {
        return Err(ApiFailure(StatusCode::BAD_REQUEST, "Todo text is required"));
    }
    let mut todos = db.write().await;
    let todo = todos
        .iter_mut()
        .find(|todo| todo.id == id)
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "Todo not found"))?;
    todo.todo = input.todo;
    todo.is_completed = input.is_completed;
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let mut todos = db.write().await;
    let index = todos
        .iter()
        .position(|todo| todo.id == id)
        .ok_or(ApiFailure(StatusCode::NOT_FOUND, "Todo not found"))?;
    todos.remove(index);
    tracing::info!(%id, "deleted todo");
    Ok(Json(serde_json::json!({ "message": "Todo deleted" })))
}
