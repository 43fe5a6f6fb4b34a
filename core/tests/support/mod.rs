//! A scripted in-memory transport that records every request it executes.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use todolist_core::{
    Gateway, HttpMethod, HttpRequest, HttpResponse, TodoClient, Transport, TransportError,
};

pub const BASE_URL: &str = "http://api.test";

#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`.
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
        self
    }

    /// Queue a transport failure (no response at all).
    pub fn fail(self, message: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::new(message)));
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    pub fn count(&self, method: HttpMethod) -> usize {
        self.sent.borrow().iter().filter(|r| r.method == method).count()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted reply left")))
    }
}

pub fn gateway(transport: ScriptedTransport) -> Gateway<ScriptedTransport> {
    Gateway::new(TodoClient::new(BASE_URL), transport)
}

pub fn todo_json(id: &str, title: &str, completed: bool) -> String {
    format!(
        r#"{{"id":"{id}","title":"{title}","completed":{completed},
            "created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z"}}"#
    )
}

pub fn list_json(todos: &[(&str, &str, bool)]) -> String {
    let items: Vec<String> = todos
        .iter()
        .map(|(id, title, completed)| todo_json(id, title, *completed))
        .collect();
    format!("[{}]", items.join(","))
}
