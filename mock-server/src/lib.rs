//! In-memory stand-in for the remote todo API.
//!
//! Implements the request/response contract the client depends on:
//! `/register`, `/login`, and bearer-protected `/todos` scoped to the user
//! who owns the token. Errors are plain-text bodies, as the client surfaces
//! them verbatim. Nothing here is durable.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /todos` and `PUT /todos/{id}`. Updates replace both fields.
#[derive(Deserialize)]
pub struct TodoInput {
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct Store {
    accounts: Vec<Account>,
    // token -> user id
    tokens: Vec<(String, String)>,
    todos: Vec<Todo>,
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, String);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Resolve the bearer token to the owning user id.
fn authorize(store: &Store, headers: &HeaderMap) -> Result<String, Rejection> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty());
    let user_id = token.and_then(|token| {
        store
            .tokens
            .iter()
            .find(|(known, _)| known == token)
            .map(|(_, user_id)| user_id.clone())
    });
    user_id.ok_or_else(|| {
        warn!("rejected request without a valid bearer token");
        (StatusCode::UNAUTHORIZED, "missing or invalid token".to_string())
    })
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<serde_json::Value>), Rejection> {
    let mut store = db.write().await;
    if store.accounts.iter().any(|a| a.user.username == input.username) {
        return Err((StatusCode::CONFLICT, "username already exists".to_string()));
    }
    let user = User {
        id: new_id(),
        username: input.username,
    };
    info!(username = %user.username, "registered user");
    store.accounts.push(Account {
        user,
        password: input.password,
    });
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "message": "user created" })),
    ))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<LoginResponse>, Rejection> {
    let mut store = db.write().await;
    let user = store
        .accounts
        .iter()
        .find(|a| a.user.username == input.username && a.password == input.password)
        .map(|a| a.user.clone())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "invalid username or password".to_string(),
        ))?;
    let token = new_id();
    store.tokens.push((token.clone(), user.id.clone()));
    info!(username = %user.username, "issued token");
    Ok(Json(LoginResponse { token, user }))
}

async fn list_todos(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<Todo>>, Rejection> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    let todos = store
        .todos
        .iter()
        .filter(|todo| todo.user_id == user_id)
        .cloned()
        .collect();
    Ok(Json(todos))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), Rejection> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let stamp = now();
    let todo = Todo {
        id: new_id(),
        title: input.title,
        completed: input.completed,
        user_id,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    store.todos.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<TodoInput>,
) -> Result<Json<Todo>, Rejection> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let todo = store
        .todos
        .iter_mut()
        .find(|todo| todo.id == id && todo.user_id == user_id)
        .ok_or((StatusCode::NOT_FOUND, "todo not found".to_string()))?;
    todo.title = input.title;
    todo.completed = input.completed;
    todo.updated_at = now();
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Rejection> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let before = store.todos.len();
    store
        .todos
        .retain(|todo| !(todo.id == id && todo.user_id == user_id));
    if store.todos.len() == before {
        return Err((StatusCode::NOT_FOUND, "todo not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_snake_case_timestamps() {
        let todo = Todo {
            id: "a1".to_string(),
            title: "Test".to_string(),
            completed: false,
            user_id: "u1".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "a1");
        assert_eq!(json["created_at"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["user_id"], "u1");
    }

    #[test]
    fn todo_input_requires_both_fields() {
        let result: Result<TodoInput, _> = serde_json::from_str(r#"{"title":"No completed"}"#);
        assert!(result.is_err());
        let input: TodoInput = serde_json::from_str(r#"{"title":"Done","completed":true}"#).unwrap();
        assert!(input.completed);
    }

    #[test]
    fn timestamps_are_rfc3339() {
        assert!(chrono::DateTime::parse_from_rfc3339(&now()).is_ok());
    }

    #[test]
    fn authorize_rejects_unknown_tokens() {
        let mut store = Store::default();
        store.tokens.push(("abc".to_string(), "u1".to_string()));

        let mut headers = HeaderMap::new();
        assert!(authorize(&store, &headers).is_err());

        headers.insert(AUTHORIZATION, "Bearer nope".parse().unwrap());
        assert_eq!(authorize(&store, &headers).unwrap_err().0, StatusCode::UNAUTHORIZED);

        headers.insert(AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(authorize(&store, &headers).unwrap(), "u1");
    }
}
