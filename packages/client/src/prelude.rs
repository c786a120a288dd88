//! torq prelude
//!
//! The types needed to configure a client, send requests through Tor and
//! inspect the outcome.

// Client and lifecycle
pub use crate::client::{ConnectionState, IpCheck, TorClient};
pub use crate::config::TorConfig;
pub use crate::proxy::ProxyConfiguration;

// Requests and responses
pub use crate::http::{IntoUrl, Response};
pub use crate::request::RequestOptions;

// Error types
pub use crate::error::{Error, Kind, Result};

// HTTP standard types from http crate
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

// URL handling
pub use url::Url;
