//! The todo list owned by the authenticated view, and its display fields.
//!
//! # Design
//! The list is never patched locally. Every load replaces the whole vector
//! with what the server returned, and a failed load leaves it empty.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use tracing::debug;

use crate::gateway::Gateway;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::Todo;

pub const INVALID_DATE: &str = "Invalid Date";
const DISPLAY_FORMAT: &str = "%b %d, %H:%M";
const WALL_CLOCK_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Default)]
pub struct TodoList {
    todos: Vec<Todo>,
    loaded_for: Option<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Refetch the full list and replace the local copy.
    pub fn refresh<T: Transport>(&mut self, gateway: &Gateway<T>, session: &Session) {
        self.todos = gateway.get_todos(session).unwrap_or_default();
        self.loaded_for = Some(session.token().to_string());
        debug!(count = self.todos.len(), "todo list replaced");
    }

    /// Load on first use and whenever the session token changes.
    /// Returns whether a fetch happened.
    pub fn sync<T: Transport>(&mut self, gateway: &Gateway<T>, session: &Session) -> bool {
        if self.loaded_for.as_deref() == Some(session.token()) {
            return false;
        }
        self.refresh(gateway, session);
        true
    }

    pub fn clear(&mut self) {
        self.todos.clear();
        self.loaded_for = None;
    }

    pub fn cards(&self) -> Vec<TodoCard<'_>> {
        self.todos.iter().map(TodoCard::new).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    Pending,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Completed => "Completed",
            Status::Pending => "Pending",
        }
    }
}

/// Derived display fields for one todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoCard<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub status: Status,
    pub created: String,
    /// Present only when the todo has been edited.
    pub updated: Option<String>,
}

impl<'a> TodoCard<'a> {
    pub fn new(todo: &'a Todo) -> Self {
        let updated = is_edited(todo).then(|| format_timestamp(&todo.updated_at));
        Self {
            id: &todo.id,
            title: &todo.title,
            status: if todo.completed {
                Status::Completed
            } else {
                Status::Pending
            },
            created: format_timestamp(&todo.created_at),
            updated,
        }
    }
}

/// ISO 8601 with or without an offset, or a bare date. Values without an
/// offset are taken as UTC+0 so they display unchanged.
fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts);
    }
    let naive = WALL_CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    FixedOffset::east_opt(0).map(|utc| utc.from_utc_datetime(&naive))
}

/// `MMM dd, HH:mm` in the timestamp's own offset, or `Invalid Date`.
pub fn format_timestamp(value: &str) -> String {
    parse_timestamp(value)
        .map(|ts| ts.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// Both timestamps parse and name different instants.
pub fn is_edited(todo: &Todo) -> bool {
    match (parse_timestamp(&todo.created_at), parse_timestamp(&todo.updated_at)) {
        (Some(created), Some(updated)) => created != updated,
        _ => false,
    }
}
