//! Error types for cachet-http.

use std::path::PathBuf;

/// Boxed source error carried by [`Error::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transport error for {url}: {source}")]
    Transport {
        url:    String,
        #[source]
        source: BoxError,
    },

    #[error("failed to decode response body from {url}: {reason}")]
    Decoding { url: String, reason: String },

    #[error("file I/O error at {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn transport(url: &str, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            url:    url.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the network rather than from local state or input.
    pub fn is_transport(&self) -> bool { matches!(self, Self::Transport { .. }) }
}
