use std::fmt;

/// Header carrying the invalidation regex of a [`Method::Ban`] request.
pub const BAN_HEADER: &str = "x-ban-url";

/// The closed set of verbs this crate issues.
///
/// `Purge` and `Ban` are not part of the standard method set; Varnish recognises them
/// as cache invalidation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
    Head,
    Purge,
    Ban,
}

impl Method {
    /// The method token as it appears on the request line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Purge => "PURGE",
            Method::Ban => "BAN",
        }
    }

    /// Whether the response to this method never carries a body.
    pub const fn is_bodiless(self) -> bool { matches!(self, Method::Head) }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Request payload, always encoded as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// `text/plain` string entity.
    Text(String),
    /// `application/x-www-form-urlencoded` key/value pairs, in order.
    Form(Vec<(String, String)>),
}

impl Body {
    pub fn text(data: impl Into<String>) -> Self { Body::Text(data.into()) }

    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Body::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Body::Text(_) => "text/plain; charset=UTF-8",
            Body::Form(_) => "application/x-www-form-urlencoded; charset=UTF-8",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Body::Text(text) => text.as_bytes().to_vec(),
            Body::Form(pairs) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter())
                .finish()
                .into_bytes(),
        }
    }
}

/// An immutable request descriptor handed to [`Transport::execute`].
///
/// [`Transport::execute`]: crate::Transport::execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method:  Method,
    url:     String,
    headers: Vec<(String, String)>,
    body:    Option<Body>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self { Self::new(Method::Get, url) }

    pub fn post(url: impl Into<String>) -> Self { Self::new(Method::Post, url) }

    pub fn delete(url: impl Into<String>) -> Self { Self::new(Method::Delete, url) }

    pub fn head(url: impl Into<String>) -> Self { Self::new(Method::Head, url) }

    /// Exact-match invalidation of the resource at `url`.
    pub fn purge(url: impl Into<String>) -> Self { Self::new(Method::Purge, url) }

    /// Pattern invalidation: sent to `url`, matching cached paths against `ban_regex`.
    pub fn ban(url: impl Into<String>, ban_regex: impl AsRef<str>) -> Self {
        Self::new(Method::Ban, url).header(BAN_HEADER, ban_regex)
    }

    /// Adds a header, replacing any earlier header of the same name.
    ///
    /// Name and value are trimmed.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) {
        let name = name.as_ref().trim();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers
            .push((name.to_string(), value.as_ref().trim().to_string()));
    }

    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.set_header("Content-Type", body.content_type());
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> Method { self.method }

    pub fn url(&self) -> &str { &self.url }

    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&Body> { self.body.as_ref() }
}
