//! Blocking HTTP helpers with conditional downloads.
//!
//! # Architecture
//!
//! The crate follows a three-layer layout:
//! - [`data`] - Immutable request descriptors, the response facade and configuration
//! - [`core`] - Pure functions: status classification, HTTP dates, decoding
//! - [`effects`] - I/O behind the [`Transport`] trait
//!
//! # Key Features
//!
//! - **Conditional GET**: `If-Modified-Since` from an explicit time or the destination's mtime
//! - **Server timestamps**: downloaded files take the server's `Last-Modified`
//! - **No leaked connections**: every response is read and released inside the call
//! - **Extension verbs**: `PURGE` and `BAN` travel through the same `execute` entry point
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cachet_http::{ClientConfig, ConditionalFetcher, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new(&ClientConfig::default())?;
//! let fetcher = ConditionalFetcher::new(transport);
//! let changed = fetcher.refresh(
//!     "https://rs.example.org/vocabulary/rank.xml",
//!     Path::new("cache/rank.xml"),
//! )?;
//! println!("rank.xml changed: {changed}");
//! # Ok::<(), cachet_http::Error>(())
//! ```

mod core;
mod data;
mod effects;
mod error;

pub use core::{
    FetchOutcome, NOT_MODIFIED, TransferOutcome, encode_url_whitespace, format_http_date,
    is_not_modified, is_success, parse_http_date,
};
pub use data::{
    AuthScope, BAN_HEADER, Body, ClientConfig, Credentials, Header, Method, Request, Response,
};
pub use effects::{
    BoxRead, ConditionalFetcher, HttpClient, RawResponse, Transport, local_last_modified,
};

#[cfg(feature = "reqwest")]
pub use effects::{ReqwestTransport, ReqwestTransportError};

pub use error::{BoxError, Error, Result};
