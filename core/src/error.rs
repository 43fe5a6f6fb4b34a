//! Error types for the todo API gateway.
//!
//! # Design
//! Field validation lives in [`crate::validation`] and never reaches this
//! type: an `ApiError` only exists once a request has been attempted, or
//! refused because no bearer token was available. The variants follow the
//! categories a form needs to tell apart when it renders an inline message.

use thiserror::Error;

use crate::transport::TransportError;

/// Message shown for failures that carry no server text.
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again";

/// Errors produced by `TodoClient` and `Gateway`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token was supplied. Raised locally, before any request.
    #[error("authentication token is required")]
    AuthenticationRequired,

    /// The server answered with a non-2xx status. `message` is the raw
    /// response text, or a status line when the body was empty.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (DNS, connect, TLS, reset...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status associated with the error, if any. A missing token is
    /// reported as 401 even though no request was made.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthenticationRequired => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text a form should display inline for this error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::AuthenticationRequired => "Authentication required, please log in".to_string(),
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Transport(_) | ApiError::Deserialization(_) | ApiError::Serialization(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.to_string())
    }
}
