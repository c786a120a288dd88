//! Verified Tor HTTP client
//!
//! `TorClient` resolves a local SOCKS port, can confirm that traffic through
//! it leaves from a different address, and forwards `get`/`post`/`put`/
//! `delete` calls through the proxy with a default timeout.
//!
//! Verification is never enforced on the verb methods: callers that want the
//! guarantee call [`TorClient::check_tor_connection`] (or use the fail-fast
//! wrappers in `torq`) first.

pub mod state;
pub mod verify;

use std::net::SocketAddr;

use http::Method;

pub use state::ConnectionState;
pub use verify::{IpCheck, parse_ip};

use crate::config::TorConfig;
use crate::connect::Route;
use crate::error::{self, Result};
use crate::http::{IntoUrl, Response};
use crate::proxy::ProxyConfiguration;
use crate::request::RequestOptions;
use crate::resolver::PortResolver;
use crate::transport::{Outgoing, Transport};

/// Blocking HTTP client routed through a local Tor SOCKS proxy.
///
/// Not meant for concurrent use: give each thread its own client.
#[derive(Debug)]
pub struct TorClient {
    config: TorConfig,
    resolver: PortResolver,
    proxy: ProxyConfiguration,
    state: ConnectionState,
    last_check: Option<IpCheck>,
    transport: Transport,
}

impl TorClient {
    /// Create a client with the default configuration. No I/O is performed.
    ///
    /// # Errors
    ///
    /// Returns a `Builder` error if the runtime or TLS setup fails.
    pub fn new() -> Result<Self> {
        Self::with_config(TorConfig::default())
    }

    /// Create a client with a custom configuration. No I/O is performed.
    ///
    /// # Errors
    ///
    /// Returns a `Builder` error if the configuration is invalid or the
    /// runtime or TLS setup fails.
    pub fn with_config(config: TorConfig) -> Result<Self> {
        config.validate().map_err(error::builder)?;

        Ok(Self {
            resolver: PortResolver::from_config(&config),
            proxy: ProxyConfiguration::new(config.proxy_host, config.ports.clone()),
            state: ConnectionState::Unresolved,
            last_check: None,
            transport: Transport::new(&config)?,
            config,
        })
    }

    /// Create a client and resolve its proxy port immediately.
    ///
    /// # Errors
    ///
    /// * `Builder` if the configuration is invalid
    /// * `ProxyUnavailable` if no candidate port has a listener
    pub fn connect(config: TorConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.resolve()?;
        Ok(client)
    }

    /// Resolve the proxy port once; later calls return the cached port.
    ///
    /// # Errors
    ///
    /// Returns `ProxyUnavailable` if no candidate port has a listener.
    pub fn resolve(&mut self) -> Result<u16> {
        if let Some(port) = self.proxy.port() {
            return Ok(port);
        }

        let port = self.resolver.resolve(self.proxy.candidates())?;
        self.proxy.set_port(port);
        self.state = ConnectionState::PortResolved;
        Ok(port)
    }

    #[inline]
    pub fn config(&self) -> &TorConfig {
        &self.config
    }

    #[inline]
    pub fn proxy(&self) -> &ProxyConfiguration {
        &self.proxy
    }

    /// The resolved proxy port, if any.
    #[inline]
    pub fn proxy_port(&self) -> Option<u16> {
        self.proxy.port()
    }

    /// The resolved proxy as a `socks5h://` URL, if any.
    pub fn proxy_url(&self) -> Option<String> {
        self.proxy.url()
    }

    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[inline]
    pub fn is_verified(&self) -> bool {
        self.state.is_verified()
    }

    /// Addresses observed by the most recent check.
    pub fn last_check(&self) -> Option<&IpCheck> {
        self.last_check.as_ref()
    }

    /// The exit address seen by the most recent successful check.
    pub fn exit_ip(&self) -> Option<&str> {
        self.last_check
            .as_ref()
            .filter(|check| check.is_verified())
            .and_then(|check| check.proxied.as_deref())
    }

    /// Make a GET request through Tor
    ///
    /// # Errors
    ///
    /// See [`TorClient::request`].
    pub fn get<U: IntoUrl>(&mut self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::GET, url, options)
    }

    /// Make a POST request through Tor
    ///
    /// # Errors
    ///
    /// See [`TorClient::request`].
    pub fn post<U: IntoUrl>(&mut self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::POST, url, options)
    }

    /// Make a PUT request through Tor
    ///
    /// # Errors
    ///
    /// See [`TorClient::request`].
    pub fn put<U: IntoUrl>(&mut self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::PUT, url, options)
    }

    /// Make a DELETE request through Tor
    ///
    /// # Errors
    ///
    /// See [`TorClient::request`].
    pub fn delete<U: IntoUrl>(&mut self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::DELETE, url, options)
    }

    /// Send a request through the proxy, resolving the port first if needed.
    ///
    /// `options` is forwarded as given. No retries are made.
    ///
    /// # Errors
    ///
    /// * `Builder` for an invalid URL or invalid options
    /// * `ProxyUnavailable` if no candidate port has a listener
    /// * `Request` for transport failures (proxy refusal, TLS, protocol)
    /// * `Redirect` for an unusable `Location` or too many redirects
    /// * `Timeout` when the call runs past its timeout, redirects included
    /// * `Status` for 4xx/5xx when `error_for_status` is in effect
    pub fn request<U: IntoUrl>(
        &mut self,
        method: Method,
        url: U,
        options: RequestOptions,
    ) -> Result<Response> {
        let mut url = url.into_url()?;
        let proxy = self.proxy_addr()?;
        let prepared = options.prepare(&mut url)?;

        let timeout = prepared.timeout.unwrap_or(self.config.timeout);
        let raise = prepared
            .error_for_status
            .unwrap_or(self.config.error_for_status);
        let max_redirects = match prepared.follow_redirects {
            Some(false) => 0,
            _ => self.config.max_redirects,
        };

        let outgoing = Outgoing {
            method,
            url,
            headers: prepared.headers,
            body: prepared.body,
        };
        let response = self
            .transport
            .execute(outgoing, Route::Socks(proxy), timeout, max_redirects)?;

        if raise {
            response.error_for_status()
        } else {
            Ok(response)
        }
    }

    fn proxy_addr(&mut self) -> Result<SocketAddr> {
        self.resolve()?;
        self.proxy
            .socket_addr()
            .ok_or_else(|| error::proxy_unavailable(self.proxy.host(), self.proxy.candidates()))
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use super::*;

    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    }

    #[test]
    fn construction_does_no_io() {
        let client = TorClient::with_config(TorConfig::default().with_ports([closed_port()]))
            .expect("valid config");
        assert_eq!(client.state(), ConnectionState::Unresolved);
        assert_eq!(client.proxy_port(), None);
        assert_eq!(client.exit_ip(), None);
    }

    #[test]
    fn invalid_config_is_a_builder_error() {
        let err = TorClient::with_config(TorConfig::default().with_ports([9050, 0]))
            .expect_err("port 0");
        assert!(err.is_builder());
    }

    #[test]
    fn empty_port_list_is_proxy_unavailable() {
        let mut client = TorClient::with_config(TorConfig::default().with_ports([]))
            .expect("empty list is a valid config");
        assert!(client.resolve().expect_err("nothing to probe").is_proxy_unavailable());
        assert!(
            client
                .check_tor_connection()
                .expect_err("nothing to probe")
                .is_proxy_unavailable()
        );
        assert_eq!(client.state(), ConnectionState::Unresolved);
        assert!(!client.state().is_resolved());
    }

    #[test]
    fn resolve_caches_the_first_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();

        let mut client = TorClient::with_config(
            TorConfig::default()
                .with_ports([closed_port(), port])
                .with_probe_timeout(Duration::from_millis(500)),
        )
        .expect("valid config");

        assert_eq!(client.resolve().expect("listener"), port);
        assert_eq!(client.state(), ConnectionState::PortResolved);
        assert_eq!(client.proxy_url(), Some(format!("socks5h://127.0.0.1:{port}")));

        drop(listener);
        assert_eq!(client.resolve().expect("cached"), port);
    }

    #[test]
    fn invalid_url_is_reported_before_probing() {
        let mut client = TorClient::with_config(TorConfig::default().with_ports([closed_port()]))
            .expect("valid config");
        let err = client
            .get("mailto:someone@example.com", RequestOptions::new())
            .expect_err("not http");
        assert!(err.is_builder());
        assert_eq!(client.state(), ConnectionState::Unresolved);
    }
}
