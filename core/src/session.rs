//! Session value and view routes.
//!
//! # Design
//! A `Session` is created at login, passed explicitly to every authenticated
//! call, and dropped at logout. It is never written anywhere. The token also
//! travels in the todo route's query string (`/todos?token=...`), so anyone
//! who can see the route can see the token; that behaviour is kept as-is.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::types::User;

/// Characters that would break a query-string value.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'=');

/// An authenticated session: the bearer token and, when the login response
/// carried one, the user it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: Option<User>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Session adopted from a route, with no user details.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(token, None)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// The two views of the client.
#[derive(Clone, PartialEq, Eq)]
pub enum Route {
    /// Login / register.
    Home,
    /// The todo list for the token in the query string.
    Todos { token: String },
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Todos { token } => {
                format!("/todos?token={}", utf8_percent_encode(token, QUERY_VALUE))
            }
        }
    }

    /// Resolve a path. Anything that is not `/todos` with a non-empty token
    /// lands on `Home`.
    pub fn parse(path: &str) -> Route {
        let (route, query) = path.split_once('?').unwrap_or((path, ""));
        if route.trim_end_matches('/') != "/todos" {
            return Route::Home;
        }
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "token")
            .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
            .filter(|token| !token.is_empty())
            .map(|token| Route::Todos { token })
            .unwrap_or(Route::Home)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "Home"),
            Route::Todos { .. } => write!(f, "Todos {{ token: <redacted> }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todos_route_carries_token_in_query() {
        let route = Route::Todos {
            token: "abc".to_string(),
        };
        assert_eq!(route.to_path(), "/todos?token=abc");
        assert_eq!(Route::parse("/todos?token=abc"), route);
    }

    #[test]
    fn jwt_style_tokens_are_left_readable() {
        let token = "eyJhbGciOi.eyJzdWIiOi-_x.sig";
        let route = Route::Todos {
            token: token.to_string(),
        };
        assert_eq!(route.to_path(), format!("/todos?token={token}"));
    }

    #[test]
    fn reserved_characters_survive_a_round_trip() {
        let route = Route::Todos {
            token: "a+b=c&d".to_string(),
        };
        let path = route.to_path();
        assert_eq!(path, "/todos?token=a%2Bb%3Dc%26d");
        assert_eq!(Route::parse(&path), route);
    }

    #[test]
    fn todos_without_token_redirects_home() {
        assert_eq!(Route::parse("/todos"), Route::Home);
        assert_eq!(Route::parse("/todos?token="), Route::Home);
        assert_eq!(Route::parse("/todos?other=1"), Route::Home);
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/elsewhere?token=abc"), Route::Home);
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::from_token("abc");
        assert!(!format!("{session:?}").contains("abc"));
        let route = Route::Todos {
            token: "abc".to_string(),
        };
        assert!(!format!("{route:?}").contains("abc"));
    }
}
