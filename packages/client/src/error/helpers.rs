use std::fmt;
use std::net::IpAddr;

/// A marker type to indicate that a call ran past its deadline.
#[derive(Debug)]
pub struct TimedOut;

impl fmt::Display for TimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("timed out")
    }
}

impl std::error::Error for TimedOut {}

/// Source of a `ProxyUnavailable` error: the host and every port probed.
#[derive(Debug, thiserror::Error)]
#[error("nothing accepted a connection on {host} at ports {ports:?}")]
pub struct NoProxyListening {
    pub host: IpAddr,
    pub ports: Vec<u16>,
}
