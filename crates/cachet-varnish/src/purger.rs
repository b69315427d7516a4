use cachet_http::{BAN_HEADER, Request, Transport, is_success};
use tracing::{debug, error, warn};
use url::Url;

use crate::error::{Error, Result};

/// Issues `PURGE` and `BAN` requests relative to a fixed base URL.
///
/// Both operations are best effort. Transport failures are logged at error level and a
/// non-2xx answer at warn level; neither reaches the caller. Only arguments that cannot
/// form a request are reported as [`Error::InvalidArgument`].
#[derive(Debug)]
pub struct CachePurger<T: Transport> {
    transport:                  T,
    base_url:                   String,
    base_url_no_trailing_slash: String,
    /// Path component of the base URL without its trailing `/`; empty for a bare host.
    base_path:                  String,
}

impl<T: Transport> CachePurger<T> {
    /// Fails with [`Error::InvalidConfiguration`] unless `base_url` is an absolute
    /// hierarchical URL such as `http://api.example.org/v1/`.
    pub fn new(transport: T, base_url: &str) -> Result<Self> {
        let base_url = base_url.trim();
        let parsed = Url::parse(base_url).map_err(|e| {
            Error::InvalidConfiguration(format!("base URL {base_url:?} must be absolute: {e}"))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(Error::InvalidConfiguration(format!(
                "base URL {base_url:?} has no path to resolve against"
            )));
        }

        Ok(Self {
            transport,
            base_url: base_url.to_string(),
            base_url_no_trailing_slash: base_url.trim_end_matches('/').to_string(),
            base_path: parsed.path().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn transport(&self) -> &T { &self.transport }

    /// Evicts the resource at `relative_path` below the base URL.
    ///
    /// A leading `/` on `relative_path` is ignored.
    pub fn purge(&self, relative_path: &str) -> Result<()> {
        let target = self.purge_target(relative_path)?;
        self.send(Request::purge(target));
        Ok(())
    }

    /// Bans every cached path matching `regex`, scoped under the base URL's path.
    ///
    /// The request goes to the base URL itself with the pattern in the `x-ban-url` header.
    pub fn ban(&self, regex: &str) -> Result<()> {
        let pattern = self.ban_pattern(regex)?;
        self.send(Request::ban(self.base_url.as_str(), pattern));
        Ok(())
    }

    fn purge_target(&self, relative_path: &str) -> Result<String> {
        let target = format!(
            "{}/{}",
            self.base_url_no_trailing_slash,
            relative_path.trim_start_matches('/')
        );
        Url::parse(&target).map_err(|e| {
            Error::InvalidArgument(format!("cannot purge {relative_path:?}: {target} is not a URL: {e}"))
        })?;
        Ok(target)
    }

    fn ban_pattern(&self, regex: &str) -> Result<String> {
        let pattern = format!("{}/{}", self.base_path, regex.trim_start_matches('/'));
        if pattern.chars().any(char::is_control) {
            return Err(Error::InvalidArgument(format!(
                "ban pattern {pattern:?} contains control characters"
            )));
        }
        Ok(pattern)
    }

    fn send(&self, request: Request) {
        let subject = request.header_value(BAN_HEADER).unwrap_or(request.url());

        match self.transport.execute(&request) {
            Ok(response) if is_success(response.status) => {
                debug!("{} {subject} accepted with {}", request.method(), response.status);
            }
            Ok(response) => {
                warn!("{} {subject} answered {}", request.method(), response.status);
            }
            Err(e) => {
                error!("Failed to {} {subject}: {e}", request.method().as_str().to_lowercase());
            }
        }
    }
}
