//! torq Public API
//!
//! Anonymized HTTP calls through a local Tor SOCKS proxy. The client is
//! re-exported from `torq_client`; this crate adds the fail-fast wrappers that
//! refuse to run a request body until the Tor exit has been verified.
//!
//! ```no_run
//! use torq::{RequestOptions, TorClient, tor_request};
//!
//! let fetch = tor_request(|tor: &mut TorClient, url: &str| {
//!     tor.get(url, RequestOptions::new()).map(|response| response.text())
//! });
//!
//! match fetch.call("https://example.com") {
//!     Ok(Ok(body)) => println!("{body}"),
//!     Ok(Err(e)) => eprintln!("request failed: {e}"),
//!     Err(e) => eprintln!("Tor not usable: {e}"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod guard;

pub use guard::{TorRequest, tor_request, with_tor, with_tor_config};

// Re-export the client surface
pub use torq_client::config::{ConfigError, DEFAULT_PORTS, TOR_BROWSER_PORT, TOR_SERVICE_PORT};
pub use torq_client::error;
pub use torq_client::prelude::*;

/// Main torq entry point providing static client constructors
pub struct Tor;

impl Tor {
    /// Create an unresolved client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Builder` error if the client cannot be set up.
    pub fn client() -> Result<TorClient> {
        TorClient::new()
    }

    /// Create an unresolved client with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Builder` error for an invalid configuration.
    pub fn with_config(config: TorConfig) -> Result<TorClient> {
        TorClient::with_config(config)
    }

    /// Create a client configured from `TORQ_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `Builder` error when a variable is malformed.
    pub fn from_env() -> Result<TorClient> {
        let config = TorConfig::from_env().map_err(error::builder)?;
        TorClient::with_config(config)
    }

    /// Create a client with the default configuration and verify it.
    ///
    /// # Errors
    ///
    /// * `ProxyUnavailable` if no candidate port has a listener
    /// * `ConnectionNotVerified` if the exit address could not be confirmed
    pub fn verified() -> Result<TorClient> {
        guard::verified_client(TorConfig::default())
    }

    /// Create a client with `config` and verify it.
    ///
    /// # Errors
    ///
    /// See [`Tor::verified`].
    pub fn verified_with(config: TorConfig) -> Result<TorClient> {
        guard::verified_client(config)
    }
}
