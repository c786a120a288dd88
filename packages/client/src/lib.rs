//! # torq client
//!
//! Blocking HTTP client that routes requests through a local Tor SOCKS5
//! proxy and can confirm that the exit address differs from the caller's own.
//!
//! - **Port resolution**: probes candidate ports (Tor Browser 9150, Tor
//!   service 9050 by default) and uses the first one listening
//! - **Verification**: compares the address reported by an IP-echo service
//!   with and without the proxy
//! - **Passthrough**: `get`/`post`/`put`/`delete` with headers, query, JSON,
//!   form or raw bodies, per-call timeout and raise-on-error; redirects are
//!   followed through the same proxy
//!
//! ## Usage
//!
//! ```no_run
//! use torq_client::{RequestOptions, TorClient};
//!
//! # fn main() -> torq_client::Result<()> {
//! let mut tor = TorClient::new()?;
//! if tor.check_tor_connection()? {
//!     let response = tor.get("https://example.com", RequestOptions::new())?;
//!     println!("{}", response.text());
//!
//!     let response = tor.post(
//!         "https://example.com/api",
//!         RequestOptions::new().json(&serde_json::json!({"key": "value"})),
//!     )?;
//!     println!("{}", response.status());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod connect;
pub mod error;
pub mod http;
pub mod proxy;
pub(crate) mod redirect;
pub mod request;
pub mod resolver;
pub(crate) mod transport;

pub mod prelude;

pub use crate::prelude::*;
