//! Form and modal state machines: login/register, add/edit todo, and the
//! delete confirmation dialog.
//!
//! # Design
//! Every modal moves `Closed -> Open -> Submitting` and then either back to
//! `Closed` (fields reset, list refetched once) or to `Failed`, which is
//! "open with an inline error". Nothing retries on its own. A submit is only
//! accepted from an open, non-submitting modal, which is what keeps a double
//! submit from reaching the network.
//!
//! The sans-IO split mirrors `TodoClient`: `begin_submit` validates and
//! hands back the payload, `finish_submit` records the outcome, and `submit`
//! strings the two together around a `Gateway` call.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::gateway::{Gateway, Mutation};
use crate::list::TodoList;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{Todo, TodoInput};
use crate::validation::{LoginDraft, RegistrationDraft, TodoDraft, Validate, ValidationErrors};

pub const INCORRECT_CREDENTIALS: &str = "Incorrect username or password";
pub const USER_CREATED: &str = "User created successfully";
pub const USER_NOT_CREATED: &str = "Error creating user";
const MISSING_ID: &str = "Todo ID is required";

/// Why a submit or confirm did not complete.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("the form is not open")]
    NotOpen,

    #[error("a submit is already in flight")]
    Busy,

    #[error("delete was not requested")]
    NotConfirming,

    #[error("todo id is required")]
    MissingId,

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FormError {
    /// Message for the form's inline error slot.
    pub fn inline_message(&self) -> String {
        match self {
            FormError::Api(err) => err.user_message(),
            FormError::MissingId => MISSING_ID.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
    Submitting,
    /// Still open, showing the inline error from the last submit.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKind {
    Add,
    Edit { id: String },
}

/// The add-todo and edit-todo dialogs.
#[derive(Debug, Clone)]
pub struct TodoModal {
    kind: ModalKind,
    defaults: TodoDraft,
    draft: TodoDraft,
    state: ModalState,
    field_errors: Option<ValidationErrors>,
    pending: Option<TodoInput>,
}

impl TodoModal {
    pub fn add() -> Self {
        Self::with_defaults(ModalKind::Add, TodoDraft::new("", false))
    }

    /// Edit dialog prefilled with the todo's current values.
    pub fn edit(todo: &Todo) -> Self {
        Self::with_defaults(
            ModalKind::Edit { id: todo.id.clone() },
            TodoDraft::new(todo.title.clone(), todo.completed),
        )
    }

    fn with_defaults(kind: ModalKind, defaults: TodoDraft) -> Self {
        Self {
            kind,
            draft: defaults.clone(),
            defaults,
            state: ModalState::Closed,
            field_errors: None,
            pending: None,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn draft(&self) -> &TodoDraft {
        &self.draft
    }

    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ModalState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn open(&mut self) {
        if self.state == ModalState::Closed {
            self.state = ModalState::Open;
        }
    }

    /// Dismiss the dialog. Ignored while a submit is in flight; field values
    /// are kept for the next open.
    pub fn close(&mut self) {
        if self.state != ModalState::Submitting {
            self.state = ModalState::Closed;
            self.field_errors = None;
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.draft.completed = Some(completed);
    }

    /// Validate the draft and enter `Submitting`. On a validation failure the
    /// dialog stays as it was and records the field errors.
    pub fn begin_submit(&mut self) -> Result<TodoInput, FormError> {
        match self.state {
            ModalState::Closed => return Err(FormError::NotOpen),
            ModalState::Submitting => return Err(FormError::Busy),
            ModalState::Open | ModalState::Failed(_) => {}
        }
        match self.draft.validate() {
            Ok(input) => {
                self.field_errors = None;
                self.state = ModalState::Submitting;
                self.pending = Some(input.clone());
                Ok(input)
            }
            Err(errors) => {
                self.field_errors = Some(errors.clone());
                Err(FormError::Invalid(errors))
            }
        }
    }

    /// Close and reset the fields. An edit dialog resets to the values it
    /// just saved.
    pub fn succeed(&mut self) {
        if let (ModalKind::Edit { .. }, Some(saved)) = (&self.kind, self.pending.take()) {
            self.defaults = TodoDraft::new(saved.title, saved.completed);
        }
        self.pending = None;
        self.draft = self.defaults.clone();
        self.state = ModalState::Closed;
    }

    /// Stay open with `message` shown inline.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.pending = None;
        self.state = ModalState::Failed(message.into());
    }

    /// Record the outcome of the request `begin_submit` prepared, handing the
    /// error back so the caller can propagate it.
    pub fn finish_submit(&mut self, outcome: Result<(), ApiError>) -> Result<(), ApiError> {
        match &outcome {
            Ok(()) => self.succeed(),
            Err(err) => self.fail(err.user_message()),
        }
        outcome
    }

    /// Validate, send the create or update, and on success refetch `list`
    /// exactly once.
    pub fn submit<T: Transport>(
        &mut self,
        gateway: &Gateway<T>,
        session: &Session,
        list: &mut TodoList,
    ) -> Result<(), FormError> {
        let input = self.begin_submit()?;
        let sent = match &self.kind {
            ModalKind::Add => gateway.create_todo(session, &input).map(|_| true),
            ModalKind::Edit { id } => gateway
                .update_todo(session, id, &input)
                .map(|mutation| matches!(mutation, Mutation::Applied(_))),
        };
        match sent {
            Ok(false) => {
                self.fail(MISSING_ID);
                Err(FormError::MissingId)
            }
            sent => {
                self.finish_submit(sent.map(drop))?;
                list.refresh(gateway, session);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState {
    Idle,
    Confirming,
    Deleting,
    Failed(String),
}

/// The "are you sure?" step in front of a delete.
#[derive(Debug, Clone)]
pub struct DeleteConfirm {
    id: String,
    state: ConfirmState,
}

impl DeleteConfirm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: ConfirmState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    /// Open the confirmation dialog.
    pub fn request(&mut self) {
        if matches!(self.state, ConfirmState::Idle) {
            self.state = ConfirmState::Confirming;
        }
    }

    pub fn cancel(&mut self) {
        if !matches!(self.state, ConfirmState::Deleting) {
            self.state = ConfirmState::Idle;
        }
    }

    /// Issue the delete. Only valid once `request` has opened the dialog;
    /// otherwise nothing is sent.
    pub fn confirm<T: Transport>(
        &mut self,
        gateway: &Gateway<T>,
        session: &Session,
        list: &mut TodoList,
    ) -> Result<(), FormError> {
        match self.state {
            ConfirmState::Idle => return Err(FormError::NotConfirming),
            ConfirmState::Deleting => return Err(FormError::Busy),
            ConfirmState::Confirming | ConfirmState::Failed(_) => {}
        }
        self.state = ConfirmState::Deleting;
        let result = match gateway.delete_todo(session, &self.id) {
            Ok(Mutation::Applied(_)) => Ok(()),
            Ok(Mutation::Skipped) => Err(FormError::MissingId),
            Err(err) => Err(FormError::Api(err)),
        };
        match result {
            Ok(()) => {
                self.state = ConfirmState::Idle;
                list.refresh(gateway, session);
                Ok(())
            }
            Err(err) => {
                self.state = ConfirmState::Failed(err.inline_message());
                Err(err)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// What a completed auth submit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn(Session),
    /// Account created; the form switched to login mode.
    Registered,
    /// The server answered 2xx but did not accept the request.
    Rejected,
}

/// Combined login / register card.
#[derive(Clone)]
pub struct AuthForm {
    mode: AuthMode,
    username: String,
    password: String,
    error: Option<String>,
    success: Option<String>,
    field_errors: Option<ValidationErrors>,
}

impl fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthForm")
            .field("mode", &self.mode)
            .field("username", &self.username)
            .field("error", &self.error)
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::Login,
            username: String::new(),
            password: String::new(),
            error: None,
            success: None,
            field_errors: None,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AuthMode) {
        if self.mode != mode {
            self.mode = mode;
            self.field_errors = None;
        }
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.set_mode(next);
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }

    fn reset_fields(&mut self) {
        self.username.clear();
        self.password.clear();
    }

    pub fn submit<T: Transport>(&mut self, gateway: &Gateway<T>) -> Result<AuthEvent, FormError> {
        let validated = match self.mode {
            AuthMode::Login => LoginDraft {
                username: self.username.clone(),
                password: self.password.clone(),
            }
            .validate(),
            AuthMode::Register => RegistrationDraft {
                username: self.username.clone(),
                password: self.password.clone(),
            }
            .validate(),
        };
        let credentials = match validated {
            Ok(credentials) => credentials,
            Err(errors) => {
                self.field_errors = Some(errors.clone());
                return Err(FormError::Invalid(errors));
            }
        };
        self.field_errors = None;
        self.error = None;
        self.success = None;

        let event = match self.mode {
            AuthMode::Login => match gateway.login(&credentials) {
                Ok(resp) => match resp.token.filter(|token| !token.is_empty()) {
                    Some(token) => AuthEvent::LoggedIn(Session::new(token, resp.user)),
                    None => {
                        self.error = Some(INCORRECT_CREDENTIALS.to_string());
                        AuthEvent::Rejected
                    }
                },
                Err(err) => {
                    self.error = Some(err.user_message());
                    return Err(FormError::Api(err));
                }
            },
            AuthMode::Register => match gateway.register(&credentials) {
                Ok(resp) if resp.success => {
                    self.mode = AuthMode::Login;
                    self.success = Some(USER_CREATED.to_string());
                    AuthEvent::Registered
                }
                Ok(resp) => {
                    debug!(message = ?resp.message, "registration refused");
                    self.error = Some(USER_NOT_CREATED.to_string());
                    AuthEvent::Rejected
                }
                Err(err) => {
                    self.error = Some(err.user_message());
                    return Err(FormError::Api(err));
                }
            },
        };
        debug!(?event, "auth form submitted");
        self.reset_fields();
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo() -> Todo {
        Todo {
            id: "a1".to_string(),
            title: "Walk dog".to_string(),
            completed: false,
            created_at: String::new(),
            updated_at: String::new(),
            user_id: None,
        }
    }

    #[test]
    fn closed_modal_refuses_submit() {
        let mut modal = TodoModal::add();
        assert!(matches!(modal.begin_submit(), Err(FormError::NotOpen)));
    }

    #[test]
    fn second_submit_while_submitting_is_refused() {
        let mut modal = TodoModal::add();
        modal.open();
        modal.set_title("Walk dog");
        modal.begin_submit().unwrap();
        assert_eq!(modal.state(), &ModalState::Submitting);
        assert!(matches!(modal.begin_submit(), Err(FormError::Busy)));
        modal.close();
        assert_eq!(modal.state(), &ModalState::Submitting);
    }

    #[test]
    fn invalid_draft_keeps_modal_open_with_field_errors() {
        let mut modal = TodoModal::add();
        modal.open();
        modal.set_title("x");
        assert!(matches!(modal.begin_submit(), Err(FormError::Invalid(_))));
        assert_eq!(modal.state(), &ModalState::Open);
        assert!(modal.field_errors().unwrap().for_field("title").is_some());
    }

    #[test]
    fn success_resets_add_fields_and_closes() {
        let mut modal = TodoModal::add();
        modal.open();
        modal.set_title("Walk dog");
        modal.set_completed(true);
        modal.begin_submit().unwrap();
        modal.succeed();
        assert!(!modal.is_open());
        assert_eq!(modal.draft(), &TodoDraft::new("", false));
    }

    #[test]
    fn edit_success_resets_to_saved_values() {
        let mut modal = TodoModal::edit(&todo());
        assert_eq!(modal.draft(), &TodoDraft::new("Walk dog", false));
        modal.open();
        modal.set_title("Walk cat");
        modal.begin_submit().unwrap();
        modal.succeed();
        assert_eq!(modal.draft(), &TodoDraft::new("Walk cat", false));
    }

    #[test]
    fn failure_stays_open_and_allows_resubmit() {
        let mut modal = TodoModal::add();
        modal.open();
        modal.set_title("Walk dog");
        modal.begin_submit().unwrap();
        modal.fail("server down");
        assert_eq!(modal.error_message(), Some("server down"));
        assert!(modal.is_open());
        assert!(modal.begin_submit().is_ok());
    }

    #[test]
    fn finish_submit_routes_outcome() {
        let mut modal = TodoModal::add();
        modal.open();
        modal.set_title("Walk dog");
        modal.begin_submit().unwrap();
        let err = ApiError::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(modal.finish_submit(Err(err)).is_err());
        assert_eq!(modal.error_message(), Some("boom"));

        modal.begin_submit().unwrap();
        modal.finish_submit(Ok(())).unwrap();
        assert!(!modal.is_open());
        assert_eq!(modal.draft(), &TodoDraft::new("", false));
    }

    #[test]
    fn cancel_closes_confirmation() {
        let mut dialog = DeleteConfirm::new("a1");
        dialog.request();
        assert_eq!(dialog.state(), &ConfirmState::Confirming);
        dialog.cancel();
        assert_eq!(dialog.state(), &ConfirmState::Idle);
    }

    #[test]
    fn auth_form_toggles_modes() {
        let mut form = AuthForm::new();
        assert_eq!(form.mode(), AuthMode::Login);
        form.toggle_mode();
        assert_eq!(form.mode(), AuthMode::Register);
        form.toggle_mode();
        assert_eq!(form.mode(), AuthMode::Login);
    }

    #[test]
    fn auth_form_debug_hides_password() {
        let mut form = AuthForm::new();
        form.set_username("alice");
        form.set_password("hunter22");
        let shown = format!("{form:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter22"));
    }
}
