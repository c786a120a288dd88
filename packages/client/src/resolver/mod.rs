//! Proxy port resolution
//!
//! Finds the first candidate port with something listening on the proxy host.
//! A probe is a plain TCP connect bounded by a short timeout; the stream is
//! shut down and dropped as soon as the outcome is known.

use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use crate::config::{DEFAULT_PROBE_TIMEOUT, TorConfig};
use crate::error::{self, Result};

/// Probes candidate ports on the proxy host, first match wins.
#[derive(Debug, Clone, Copy)]
pub struct PortResolver {
    host: IpAddr,
    probe_timeout: Duration,
}

impl PortResolver {
    pub fn new(host: IpAddr) -> Self {
        Self {
            host,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn from_config(config: &TorConfig) -> Self {
        Self::new(config.proxy_host).with_probe_timeout(config.probe_timeout)
    }

    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    /// Return the first port in `ports` that accepts a connection.
    ///
    /// # Errors
    ///
    /// * `Builder` if a candidate is port 0
    /// * `ProxyUnavailable` if no candidate accepts a connection, including
    ///   when `ports` is empty
    pub fn resolve(&self, ports: &[u16]) -> Result<u16> {
        if ports.contains(&0) {
            return Err(error::builder("port 0 is not a valid SOCKS port"));
        }

        for &port in ports {
            if self.probe(port) {
                tracing::debug!("SOCKS proxy found on {}:{}", self.host, port);
                return Ok(port);
            }
        }

        Err(error::proxy_unavailable(self.host, ports))
    }

    /// True if a TCP connection to `port` succeeds within the probe timeout.
    pub fn probe(&self, port: u16) -> bool {
        let addr = SocketAddr::new(self.host, port);
        match TcpStream::connect_timeout(&addr, self.probe_timeout) {
            Ok(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
                true
            }
            Err(e) => {
                tracing::debug!("No proxy on {}: {}", addr, e);
                false
            }
        }
    }
}
