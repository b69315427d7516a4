use crate::core::is_success;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name:  String,
    pub value: String,
}

/// A fully materialized HTTP response.
///
/// The body has already been read and decoded and the connection released by the time
/// a `Response` exists, so holding one never pins a transport resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status:  u16,
    headers: Vec<Header>,
    body:    Option<String>,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Option<String>) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(name, value)| Header { name, value })
                .collect(),
            body,
        }
    }

    pub fn status_code(&self) -> u16 { self.status }

    pub fn is_success(&self) -> bool { is_success(self.status) }

    /// First value of the header `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> { self.headers(name).next() }

    pub fn last_header(&self, name: &str) -> Option<&str> { self.headers(name).last() }

    pub fn headers<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.headers
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn contains_header(&self, name: &str) -> bool { self.header(name).is_some() }

    /// All headers in the order the transport reported them.
    pub fn all_headers(&self) -> &[Header] { &self.headers }

    pub fn body_text(&self) -> Option<&str> { self.body.as_deref() }

    pub fn into_body_text(self) -> Option<String> { self.body }
}
