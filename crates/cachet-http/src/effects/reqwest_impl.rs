use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::{Method as WireMethod, Proxy};

use crate::data::{ClientConfig, Method, Request};
use crate::effects::transport::{RawResponse, Transport};
use crate::error::{Error, Result};

#[derive(Debug, thiserror::Error)]
pub enum ReqwestTransportError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("method token {0} rejected by the HTTP stack")]
    Method(&'static str),
}

/// Production transport backed by a pooled `reqwest::blocking::Client`.
///
/// Content decompression is left off so compressed payloads are stored as served.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .pool_max_idle_per_host(config.max_per_route)
            .user_agent(config.effective_user_agent())
            .redirect(Policy::limited(config.max_redirects));

        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        if let Some(proxy) = config.proxy_url()? {
            let proxy = Proxy::all(proxy.as_str()).map_err(|e| {
                Error::InvalidConfiguration(format!("invalid proxy {proxy}: {e}"))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::InvalidConfiguration(format!("failed to build client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Client) -> Self { Self { client } }

    fn wire_method(method: Method) -> std::result::Result<WireMethod, ReqwestTransportError> {
        Ok(match method {
            Method::Get => WireMethod::GET,
            Method::Post => WireMethod::POST,
            Method::Delete => WireMethod::DELETE,
            Method::Head => WireMethod::HEAD,
            Method::Purge | Method::Ban => WireMethod::from_bytes(method.as_str().as_bytes())
                .map_err(|_| ReqwestTransportError::Method(method.as_str()))?,
        })
    }
}

impl Transport for ReqwestTransport {
    type Error = ReqwestTransportError;

    fn execute(&self, request: &Request) -> std::result::Result<RawResponse, Self::Error> {
        let mut builder = self
            .client
            .request(Self::wire_method(request.method())?, request.url());

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_bytes());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(RawResponse::new(status, headers, Box::new(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_methods_map_to_wire_tokens() {
        assert_eq!(
            ReqwestTransport::wire_method(Method::Purge).unwrap().as_str(),
            "PURGE"
        );
        assert_eq!(ReqwestTransport::wire_method(Method::Ban).unwrap().as_str(), "BAN");
        assert_eq!(ReqwestTransport::wire_method(Method::Head).unwrap(), WireMethod::HEAD);
    }

    #[test]
    fn test_builds_from_default_config() {
        assert!(ReqwestTransport::new(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ClientConfig::default().timeout_ms(0);
        assert!(matches!(
            ReqwestTransport::new(&config),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
