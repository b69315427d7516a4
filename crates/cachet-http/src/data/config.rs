use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_MAX_CONNECTIONS: usize = 250;
const DEFAULT_MAX_PER_ROUTE: usize = 5;
const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Transport configuration, passed explicitly at construction.
///
/// # Examples
///
/// ```
/// use cachet_http::ClientConfig;
///
/// let config = ClientConfig::from_toml_str(
///     r#"
///     timeout_ms = 10000
///     proxy = "proxy.example.org:3128"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.timeout_ms, 10_000);
/// assert_eq!(config.max_per_route, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Connect and whole-request timeout in milliseconds.
    pub timeout_ms:      u64,
    /// Total connection budget. Only advertised in the user agent; the pool is sized per route.
    pub max_connections: usize,
    /// Idle pooled connections kept per host.
    pub max_per_route:   usize,
    /// Overrides the generated User-Agent header.
    pub user_agent:      Option<String>,
    /// Proxy as a URL or `host:port`.
    pub proxy:           Option<String>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy:    bool,
    pub max_redirects:   usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms:      DEFAULT_TIMEOUT_MS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_per_route:   DEFAULT_MAX_PER_ROUTE,
            user_agent:      None,
            proxy:           None,
            system_proxy:    true,
            max_redirects:   DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl ClientConfig {
    /// A configuration for a client used from a single thread at a time.
    pub fn single_threaded(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            max_connections: 1,
            max_per_route: 1,
            user_agent: Some(user_agent_with(&format!("S-{timeout_ms}"))),
            ..Self::default()
        }
    }

    /// A configuration for a client shared between threads.
    pub fn multi_threaded(timeout_ms: u64, max_connections: usize, max_per_route: usize) -> Self {
        Self {
            timeout_ms,
            max_connections,
            max_per_route,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    #[must_use]
    pub fn system_proxy(mut self, enabled: bool) -> Self {
        self.system_proxy = enabled;
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| Error::InvalidConfiguration(format!("malformed client config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfiguration(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        if self.max_per_route == 0 {
            return Err(Error::InvalidConfiguration(
                "max_per_route must be greater than zero".into(),
            ));
        }
        self.proxy_url().map(|_| ())
    }

    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }

    /// The configured user agent, or one describing this configuration.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            user_agent_with(&format!(
                "M-{}-{}-{}",
                self.timeout_ms, self.max_connections, self.max_per_route
            ))
        })
    }

    /// The proxy as an absolute URL; a bare `host:port` is read as plain HTTP.
    pub fn proxy_url(&self) -> Result<Option<Url>> {
        let Some(proxy) = self.proxy.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let candidate = if proxy.contains("://") {
            proxy.to_string()
        } else {
            format!("http://{proxy}")
        };
        let url = Url::parse(&candidate)
            .map_err(|e| Error::InvalidConfiguration(format!("invalid proxy {proxy}: {e}")))?;
        if url.host_str().is_none() {
            return Err(Error::InvalidConfiguration(format!(
                "proxy {proxy} has no host"
            )));
        }
        Ok(Some(url))
    }
}

fn user_agent_with(tag: &str) -> String {
    format!(
        "{}/{} (Rust; {tag})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}
