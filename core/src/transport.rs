//! The IO seam between the sans-IO core and whatever executes HTTP.

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// Executes one `HttpRequest` and returns the server's answer as data.
///
/// Implementations must return non-2xx responses as `Ok`; status
/// interpretation belongs to `TodoClient`. `Err` is reserved for requests
/// that produced no response at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// A request that never produced a response.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
