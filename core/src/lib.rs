//! Sans-IO client core for the todo list service.
//!
//! # Overview
//! Everything between a user's form input and the remote todo API, except
//! the network itself: validation schemas, request builders and response
//! parsers, gateway functions, the session value, form state machines, the
//! list view-model and the session shell. A [`Transport`] implementation
//! executes the HTTP round-trips.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url` and splits every
//!   operation into `build_*` (produces a request) and `parse_*` (consumes a
//!   response).
//! - `Gateway` runs those pairs over a `Transport`. Reads fail soft
//!   (`Fetched`), writes fail loud (`Result`).
//! - The session token is an explicit value passed to every authenticated
//!   call; nothing is persisted.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod http;
pub mod list;
pub mod session;
pub mod shell;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::TodoClient;
pub use error::ApiError;
pub use forms::{AuthEvent, AuthForm, AuthMode, DeleteConfirm, FormError, ModalState, TodoModal};
pub use gateway::{Fetched, Gateway, Mutation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{TodoCard, TodoList};
pub use session::{Route, Session};
pub use shell::{Shell, View};
pub use transport::{Transport, TransportError};
pub use types::{Credentials, DeleteResponse, LoginResponse, RegisterResponse, Todo, TodoInput, User};
pub use validation::{FieldError, LoginDraft, RegistrationDraft, TodoDraft, Validate, ValidationErrors};
