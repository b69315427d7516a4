//! Immutable values passed between the layers: request descriptors, the response
//! facade, client configuration and credentials.

mod auth;
mod config;
mod request;
mod response;

pub use auth::{AuthScope, Credentials};
pub use config::ClientConfig;
pub use request::{BAN_HEADER, Body, Method, Request};
pub use response::{Header, Response};
