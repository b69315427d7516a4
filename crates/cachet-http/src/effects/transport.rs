use std::io::Read;
use std::sync::Arc;

use crate::core::{decode_body, is_not_modified};
use crate::data::{Request, Response};
use crate::error::{Error, Result};

/// A response body still attached to its connection.
pub type BoxRead = Box<dyn Read + Send>;

/// What a [`Transport`] hands back: status line, headers and an unread body.
///
/// Dropping it releases the underlying connection.
pub struct RawResponse {
    pub status:  u16,
    pub headers: Vec<(String, String)>,
    pub body:    BoxRead,
}

impl RawResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: BoxRead) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Reads and decodes the body, consuming the raw response.
    ///
    /// HEAD requests, 204 and 304 responses yield no body.
    pub fn into_response(mut self, request: &Request) -> Result<Response> {
        let bodiless =
            request.method().is_bodiless() || self.status == 204 || is_not_modified(self.status);

        let body = if bodiless {
            None
        } else {
            let mut bytes = Vec::new();
            self.body
                .read_to_end(&mut bytes)
                .map_err(|e| Error::transport(request.url(), e))?;
            let text = decode_body(bytes, self.header("Content-Type")).map_err(|reason| {
                Error::Decoding {
                    url: request.url().to_string(),
                    reason,
                }
            })?;
            Some(text)
        };

        Ok(Response::new(self.status, self.headers, body))
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &"{ ... }")
            .finish()
    }
}

/// Blocking HTTP transport abstraction.
///
/// Implementations own connection pooling, TLS, redirects and timeouts. They must pass
/// the method token and headers of the [`Request`] through unchanged, including the
/// non-standard `PURGE` and `BAN` verbs.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: production implementation using `reqwest::blocking`
/// - Mock implementations for testing
///
/// [`ReqwestTransport`]: crate::ReqwestTransport
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `request` and returns once the status line and headers are available.
    ///
    /// Non-2xx statuses are not errors at this level.
    fn execute(&self, request: &Request) -> std::result::Result<RawResponse, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Error = T::Error;

    fn execute(&self, request: &Request) -> std::result::Result<RawResponse, Self::Error> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Error = T::Error;

    fn execute(&self, request: &Request) -> std::result::Result<RawResponse, Self::Error> {
        (**self).execute(request)
    }
}

/// Executes `request` and materializes the response before returning.
pub(crate) fn exchange<T: Transport>(transport: &T, request: &Request) -> Result<Response> {
    transport
        .execute(request)
        .map_err(|e| Error::transport(request.url(), e))?
        .into_response(request)
}
