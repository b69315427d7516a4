//! I/O: the transport seam and everything that drives it.

mod client;
mod fetcher;
#[cfg(feature = "reqwest")]
mod reqwest_impl;
mod transport;

pub use client::HttpClient;
pub use fetcher::{ConditionalFetcher, local_last_modified};
pub use transport::{BoxRead, RawResponse, Transport};

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ReqwestTransport, ReqwestTransportError};
