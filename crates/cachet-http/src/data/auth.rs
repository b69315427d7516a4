use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use url::Url;

use crate::data::Request;
use crate::error::{Error, Result};

/// Username and password, both trimmed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        Self {
            username: username.as_ref().trim().to_string(),
            password: password.as_ref().trim().to_string(),
        }
    }

    pub fn username(&self) -> &str { &self.username }

    /// Value for an `Authorization` header using the basic scheme.
    pub fn basic_authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Credentials bound to a host, any port and any realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScope {
    host:        String,
    credentials: Credentials,
}

impl AuthScope {
    /// Scopes `credentials` to the host of `url`.
    pub fn for_url(url: &str, credentials: Credentials) -> Result<Self> {
        let host = host_of(url)?;
        Ok(Self { host, credentials })
    }

    pub fn host(&self) -> &str { &self.host }

    /// Whether `url` targets this scope's host.
    pub fn matches(&self, url: &str) -> bool {
        host_of(url).is_ok_and(|host| host.eq_ignore_ascii_case(&self.host))
    }

    /// Adds a preemptive basic `Authorization` header when the request targets this scope.
    ///
    /// Returns whether the header was added.
    pub fn authorize(&self, request: &mut Request) -> bool {
        if !self.matches(request.url()) {
            return false;
        }
        tracing::debug!("Authentication used for scope {}", self.host);
        request.set_header("Authorization", self.credentials.basic_authorization());
        true
    }
}

fn host_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
        url:    url.to_string(),
        reason: e.to_string(),
    })?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidUrl {
            url:    url.to_string(),
            reason: "URL has no host".into(),
        })
}
