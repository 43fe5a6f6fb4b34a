//! Request builders and response parsers for the remote todo service.
//!
//! # Design
//! `TodoClient` knows the service root and nothing else. Every remote call
//! (login, register and the four todo operations) is a `build_*` method
//! yielding an `HttpRequest` plus a `parse_*` method taking the `HttpResponse`.
//! Authenticated builders refuse an empty token, so a missing session fails
//! before a request even exists.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Credentials, DeleteResponse, LoginResponse, RegisterResponse, Todo, TodoInput};

/// Characters that would end or redirect a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Builds and parses requests for the remote todo service.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/login", None, credentials)
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/register", None, credentials)
    }

    pub fn build_list_todos(&self, token: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: vec![bearer(token)?],
            body: None,
        })
    }

    pub fn build_create_todo(&self, token: &str, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos", Some(token), input)
    }

    pub fn build_update_todo(
        &self,
        token: &str,
        id: &str,
        input: &TodoInput,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &todo_path(id), Some(token), input)
    }

    pub fn build_delete_todo(&self, token: &str, id: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{}", self.base_url, todo_path(id)),
            headers: vec![bearer(token)?],
            body: None,
        })
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<RegisterResponse, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    /// Any 2xx counts as a successful delete, whatever the body holds.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<DeleteResponse, ApiError> {
        check_status(&response)?;
        Ok(DeleteResponse { success: true })
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        route: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = token {
            headers.push(bearer(token)?);
        }
        headers.push(("content-type".to_string(), "application/json".to_string()));
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{route}", self.base_url),
            headers,
            body: Some(body),
        })
    }
}

fn todo_path(id: &str) -> String {
    format!("/todos/{}", utf8_percent_encode(id, PATH_SEGMENT))
}

fn bearer(token: &str) -> Result<(String, String), ApiError> {
    if token.trim().is_empty() {
        return Err(ApiError::AuthenticationRequired);
    }
    Ok(("authorization".to_string(), format!("Bearer {token}")))
}

/// Map non-2xx responses to `ApiError::Http`, keeping the server's text.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let text = response.body.trim();
    let message = if text.is_empty() {
        format!("HTTP error, status {}", response.status)
    } else {
        text.to_string()
    };
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
