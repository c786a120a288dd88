//! Core configuration structure and defaults

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use url::Url;

/// SOCKS port opened by Tor Browser.
pub const TOR_BROWSER_PORT: u16 = 9150;

/// SOCKS port opened by the Tor system service.
pub const TOR_SERVICE_PORT: u16 = 9050;

/// Candidate ports probed when none are configured, in probe order.
pub const DEFAULT_PORTS: [u16; 2] = [TOR_BROWSER_PORT, TOR_SERVICE_PORT];

/// Request timeout applied when a call does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for a single port probe. Kept separate from the request timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest redirect chain followed before a call fails.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Public IP-echo service used to compare direct and proxied addresses.
pub const DEFAULT_IP_CHECK_URL: &str = "https://api.ipify.org?format=json";

/// Tor client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TorConfig {
    /// Candidate SOCKS ports, probed in order
    pub ports: Vec<u16>,

    /// Host the SOCKS proxy listens on
    pub proxy_host: IpAddr,

    /// Request timeout
    pub timeout: Duration,

    /// Port probe timeout
    pub probe_timeout: Duration,

    /// IP-echo endpoint
    pub ip_check_url: Url,

    /// User agent string
    pub user_agent: String,

    /// Turn 4xx/5xx responses into errors unless a call overrides it
    pub error_for_status: bool,

    /// Redirect hops followed per call; 0 returns 3xx responses as-is
    pub max_redirects: usize,
}

impl Default for TorConfig {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            proxy_host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            ip_check_url: default_ip_check_url(),
            user_agent: concat!("torq/", env!("CARGO_PKG_VERSION")).to_string(),
            error_for_status: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

#[allow(clippy::expect_used)]
pub(crate) fn default_ip_check_url() -> Url {
    // Constant input; a parse failure here is a programming error.
    Url::parse(DEFAULT_IP_CHECK_URL).expect("DEFAULT_IP_CHECK_URL is a valid URL")
}
