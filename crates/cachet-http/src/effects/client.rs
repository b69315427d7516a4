use tracing::{debug, info};

use crate::core::parse_url;
use crate::data::{AuthScope, Body, Credentials, Request, Response};
use crate::effects::transport::{Transport, exchange};
use crate::error::Result;

/// Thin request helpers over an injected [`Transport`].
///
/// Every call returns a fully read [`Response`]; non-2xx statuses are returned, not raised.
pub struct HttpClient<T: Transport> {
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T) -> Self { Self { transport } }

    pub fn transport(&self) -> &T { &self.transport }

    pub fn get(&self, url: &str) -> Result<Response> { self.get_with(url, &[], None) }

    pub fn get_with(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        credentials: Option<&Credentials>,
    ) -> Result<Response> {
        self.send(with_headers(Request::get(url), headers), credentials)
    }

    pub fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        credentials: Option<&Credentials>,
        body: Option<Body>,
    ) -> Result<Response> {
        let mut request = with_headers(Request::post(url), headers);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.send(request, credentials)
    }

    pub fn delete(&self, url: &str, credentials: Option<&Credentials>) -> Result<Response> {
        info!("HTTP DELETE to {url}");
        self.send(Request::delete(url), credentials)
    }

    /// Sends a HEAD request; any response at all counts as reachable.
    pub fn verify_host(&self, url: &str) -> bool {
        match self.send(Request::head(url), None) {
            Ok(response) => {
                debug!("Host {url} answered HEAD with {}", response.status_code());
                true
            }
            Err(e) => {
                debug!("Host {url} unreachable: {e}");
                false
            }
        }
    }

    fn send(&self, mut request: Request, credentials: Option<&Credentials>) -> Result<Response> {
        parse_url(request.url())?;
        if let Some(credentials) = credentials {
            AuthScope::for_url(request.url(), credentials.clone())?.authorize(&mut request);
        }
        exchange(&self.transport, &request)
    }
}

fn with_headers(request: Request, headers: &[(&str, &str)]) -> Request {
    headers
        .iter()
        .fold(request, |request, (name, value)| request.header(name, value))
}
