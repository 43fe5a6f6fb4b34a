//! One function per remote operation, executed through a `Transport`.
//!
//! # Design
//! Reads and writes fail differently, and the return types say so:
//! - `get_todos` is fail-soft. Every failure is absorbed into
//!   `Fetched::Unavailable`, and callers fall back to an empty list.
//! - `login`, `register` and the three mutations are fail-loud. Errors come
//!   back as `Err` so the originating form can show them; a write that failed
//!   quietly would look like data loss.
//!
//! Update and delete short-circuit to `Mutation::Skipped` when handed an
//! empty id. No retries anywhere.

use tracing::{debug, info, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{Credentials, DeleteResponse, LoginResponse, RegisterResponse, Todo, TodoInput};

/// Result of a fail-soft read.
#[derive(Debug)]
pub enum Fetched<T> {
    Loaded(T),
    /// The read failed; the error is kept for logging and tests.
    Unavailable(ApiError),
}

impl<T> Fetched<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Fetched::Loaded(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Loaded(value) => Some(value),
            Fetched::Unavailable(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Fetched::Loaded(_) => None,
            Fetched::Unavailable(err) => Some(err),
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

/// Result of a write that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    Applied(T),
    /// Nothing was sent because the todo id was empty.
    Skipped,
}

/// Executes `TodoClient` requests over a `Transport`.
#[derive(Debug, Clone)]
pub struct Gateway<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let result = self
            .client
            .build_login(credentials)
            .and_then(|req| self.round_trip(req))
            .and_then(|resp| self.client.parse_login(resp));
        match &result {
            Ok(_) => info!(username = %credentials.username, "login accepted"),
            Err(err) => warn!(username = %credentials.username, error = %err, "login failed"),
        }
        result
    }

    pub fn register(&self, credentials: &Credentials) -> Result<RegisterResponse, ApiError> {
        let result = self
            .client
            .build_register(credentials)
            .and_then(|req| self.round_trip(req))
            .and_then(|resp| self.client.parse_register(resp));
        match &result {
            Ok(_) => info!(username = %credentials.username, "registration accepted"),
            Err(err) => warn!(username = %credentials.username, error = %err, "registration failed"),
        }
        result
    }

    pub fn get_todos(&self, session: &Session) -> Fetched<Vec<Todo>> {
        let result = self
            .client
            .build_list_todos(session.token())
            .and_then(|req| self.round_trip(req))
            .and_then(|resp| self.client.parse_list_todos(resp));
        match result {
            Ok(todos) => {
                debug!(count = todos.len(), "fetched todos");
                Fetched::Loaded(todos)
            }
            Err(err) => {
                warn!(error = %err, "fetching todos failed, showing an empty list");
                Fetched::Unavailable(err)
            }
        }
    }

    pub fn create_todo(&self, session: &Session, input: &TodoInput) -> Result<Todo, ApiError> {
        self.client
            .build_create_todo(session.token(), input)
            .and_then(|req| self.round_trip(req))
            .and_then(|resp| self.client.parse_create_todo(resp))
            .inspect_err(|err| warn!(error = %err, "creating todo failed"))
    }

    pub fn update_todo(
        &self,
        session: &Session,
        id: &str,
        input: &TodoInput,
    ) -> Result<Mutation<Todo>, ApiError> {
        if id.is_empty() {
            warn!("todo id is required for update");
            return Ok(Mutation::Skipped);
        }
        self.client
            .build_update_todo(session.token(), id, input)
            .and_then(|req| self.round_trip(req))
            .and_then(|resp| self.client.parse_update_todo(resp))
            .map(Mutation::Applied)
            .inspect_err(|err| warn!(id, error = %err, "updating todo failed"))
    }

    pub fn delete_todo(&self, session: &Session, id: &str) -> Result<Mutation<DeleteResponse>, ApiError> {
        if id.is_empty() {
            warn!("todo id is required for delete");
            return Ok(Mutation::Skipped);
        }
        self.client
            .build_delete_todo(session.token(), id)
            .and_then(|req| self.round_trip(req))
            .and_then(|resp| self.client.parse_delete_todo(resp))
            .map(Mutation::Applied)
            .inspect_err(|err| warn!(id, error = %err, "deleting todo failed"))
    }

    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
