//! SOCKS proxy selection
//!
//! `ProxyConfiguration` pairs the ordered candidate ports with the port the
//! resolver settled on. The chosen port is written once and never re-probed.

pub mod socks;

use std::net::{IpAddr, SocketAddr};

pub use socks::{SocksError, TargetAddr, socks5_handshake};

/// Candidate ports and the resolved SOCKS endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfiguration {
    host: IpAddr,
    candidates: Vec<u16>,
    chosen: Option<u16>,
}

impl ProxyConfiguration {
    pub fn new(host: IpAddr, candidates: Vec<u16>) -> Self {
        Self {
            host,
            candidates,
            chosen: None,
        }
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn candidates(&self) -> &[u16] {
        &self.candidates
    }

    /// The resolved port, if resolution has succeeded.
    pub fn port(&self) -> Option<u16> {
        self.chosen
    }

    pub fn is_resolved(&self) -> bool {
        self.chosen.is_some()
    }

    pub(crate) fn set_port(&mut self, port: u16) {
        self.chosen = Some(port);
    }

    /// Socket address of the resolved proxy.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.chosen.map(|port| SocketAddr::new(self.host, port))
    }

    /// Proxy URL in `socks5h://host:port` form; hostnames are resolved by Tor.
    pub fn url(&self) -> Option<String> {
        self.socket_addr().map(|addr| format!("socks5h://{addr}"))
    }
}
