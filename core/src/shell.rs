//! The session shell: which view is showing, and the state behind it.
//!
//! # Design
//! The shell owns the only mutable state in the client: the optional
//! `Session`, the todo list and the current `Route`. Child forms get the
//! session passed in for each call rather than reading it from anywhere
//! global. Logout is a local reset and sends nothing.

use tracing::info;

use crate::forms::{AuthEvent, AuthForm, DeleteConfirm, FormError, TodoModal};
use crate::gateway::Gateway;
use crate::list::TodoList;
use crate::session::{Route, Session};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Unauthenticated: login / register form.
    Login,
    /// Authenticated: the todo list and its mutation affordances.
    Todos,
}

#[derive(Debug)]
pub struct Shell<T> {
    gateway: Gateway<T>,
    session: Option<Session>,
    auth_form: AuthForm,
    list: TodoList,
    route: Route,
}

impl<T: Transport> Shell<T> {
    pub fn new(gateway: Gateway<T>) -> Self {
        Self {
            gateway,
            session: None,
            auth_form: AuthForm::new(),
            list: TodoList::new(),
            route: Route::Home,
        }
    }

    pub fn view(&self) -> View {
        if self.session.is_some() {
            View::Todos
        } else {
            View::Login
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn auth_form(&self) -> &AuthForm {
        &self.auth_form
    }

    pub fn auth_form_mut(&mut self) -> &mut AuthForm {
        &mut self.auth_form
    }

    /// Submit the login/register form. A successful login moves to the todo
    /// route carrying the new token and loads the list.
    pub fn submit_auth(&mut self) -> Result<AuthEvent, FormError> {
        let event = self.auth_form.submit(&self.gateway)?;
        if let AuthEvent::LoggedIn(session) = &event {
            self.enter(session.clone());
        }
        Ok(event)
    }

    /// Go to `route`. Entering the todo route adopts the token it carries.
    pub fn navigate(&mut self, route: Route) {
        match route {
            Route::Home => {
                self.session = None;
                self.list.clear();
                self.route = Route::Home;
            }
            Route::Todos { token } => self.enter(Session::from_token(token)),
        }
    }

    /// Refetch the list for the current session.
    pub fn reload(&mut self) {
        if let Some(session) = &self.session {
            self.list.refresh(&self.gateway, session);
        }
    }

    pub fn submit_modal(&mut self, modal: &mut TodoModal) -> Result<(), FormError> {
        let session = self.active_session();
        modal.submit(&self.gateway, &session, &mut self.list)
    }

    pub fn confirm_delete(&mut self, dialog: &mut DeleteConfirm) -> Result<(), FormError> {
        let session = self.active_session();
        dialog.confirm(&self.gateway, &session, &mut self.list)
    }

    // Logged out: an empty token, which the gateway refuses with
    // `AuthenticationRequired` before building a request.
    fn active_session(&self) -> Session {
        self.session.clone().unwrap_or_else(|| Session::from_token(""))
    }

    /// Drop the session and return to the login view. Purely local.
    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("logged out");
        }
        self.list.clear();
        self.route = Route::Home;
    }

    fn enter(&mut self, session: Session) {
        self.route = Route::Todos {
            token: session.token().to_string(),
        };
        self.list.sync(&self.gateway, &session);
        self.session = Some(session);
    }
}
