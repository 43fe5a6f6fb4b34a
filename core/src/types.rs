//! Wire DTOs for the remote todo API.
//!
//! # Design
//! These mirror the remote API's JSON shapes but are defined independently
//! of the mock-server crate; integration tests catch schema drift. Todos
//! accept both `created_at` and `createdAt` spellings because the API has
//! served both.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
///
/// `id`, `created_at` and `updated_at` are assigned by the server. The
/// timestamps stay as the server's ISO 8601 strings; [`crate::list`] parses
/// them for display and tolerates garbage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: String,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: String,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Request payload for creating or replacing a todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoInput {
    pub title: String,
    pub completed: bool,
}

/// Username and password, used once per submit and never stored.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// Body of a successful `POST /login`.
///
/// `token` is optional on the wire: a 2xx without a token is a failed login
/// as far as the login form is concerned.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

/// Body of a successful `POST /register`. `success` defaults to `true`
/// when the server leaves it out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
}

fn default_success() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_accepts_camel_case_timestamps() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":"a1","title":"Walk","completed":false,"userId":"u1",
                "createdAt":"2024-01-01T10:00:00Z","updatedAt":"2024-01-02T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.created_at, "2024-01-01T10:00:00Z");
        assert_eq!(todo.updated_at, "2024-01-02T10:00:00Z");
        assert_eq!(todo.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn todo_tolerates_missing_timestamps() {
        let todo: Todo = serde_json::from_str(r#"{"id":"a1","title":"Walk","completed":true}"#).unwrap();
        assert!(todo.created_at.is_empty());
        assert!(todo.user_id.is_none());
    }

    #[test]
    fn register_response_defaults_success() {
        let resp: RegisterResponse = serde_json::from_str(r#"{"message":"created"}"#).unwrap();
        assert!(resp.success);
        let resp: RegisterResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let creds = Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("secret"));

        let login = LoginResponse {
            token: Some("abc".to_string()),
            user: None,
        };
        assert!(!format!("{login:?}").contains("abc"));
    }
}
