//! Varnish cache invalidation over any [`cachet_http::Transport`].
//!
//! Varnish frees cached objects two ways. `PURGE` evicts one resource by its exact URL.
//! `BAN` marks every object whose path matches a regular expression as stale; banned
//! objects stay in memory until they are looked up or expire.
//!
//! Invalidation is advisory: [`CachePurger`] logs network failures instead of returning
//! them, so a flaky cache never fails the write that triggered it.
//!
//! ```no_run
//! use cachet_http::{ClientConfig, ReqwestTransport};
//! use cachet_varnish::{CachePurger, any_key, path};
//!
//! let transport = ReqwestTransport::new(&ClientConfig::default())?;
//! let purger = CachePurger::new(transport, "http://api.example.org/v1/")?;
//!
//! purger.purge(&path(["occurrence", "15"]))?;
//! purger.ban(&path(["dataset", any_key([3, 7, 11]).as_str(), ".*"]))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod keys;
mod purger;

pub use error::{Error, Result};
pub use keys::{any_key, path};
pub use purger::CachePurger;
