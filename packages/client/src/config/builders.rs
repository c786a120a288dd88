//! Builder methods for `TorConfig`

use std::net::IpAddr;
use std::time::Duration;

use url::Url;

use super::types::TorConfig;

impl TorConfig {
    /// Set the candidate SOCKS ports
    ///
    /// Ports are probed in the given order and the first one accepting a
    /// connection is used, so list the most specific proxy first.
    ///
    /// # Examples
    /// ```
    /// use torq_client::config::TorConfig;
    ///
    /// let config = TorConfig::default().with_ports([9050]);
    /// assert_eq!(config.ports, vec![9050]);
    /// ```
    #[must_use]
    pub fn with_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.ports = ports.into_iter().collect();
        self
    }

    /// Set the request timeout
    ///
    /// Bounds every HTTP call, including the two IP-echo fetches of
    /// `check_tor_connection`, unless a call overrides it.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use torq_client::config::TorConfig;
    ///
    /// let config = TorConfig::default().with_timeout(Duration::from_secs(30));
    /// assert_eq!(config.timeout, Duration::from_secs(30));
    /// ```
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the port probe timeout
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the host the SOCKS proxy listens on
    #[must_use]
    pub fn with_proxy_host(mut self, host: IpAddr) -> Self {
        self.proxy_host = host;
        self
    }

    /// Set the IP-echo endpoint
    ///
    /// The endpoint must answer with the caller's address, either as
    /// `{"ip": "..."}` JSON or as plain text.
    #[must_use]
    pub fn with_ip_check_url(mut self, url: Url) -> Self {
        self.ip_check_url = url;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set how many redirects a call follows
    ///
    /// `0` disables redirect handling: 3xx responses are returned to the
    /// caller unchanged.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Turn 4xx/5xx responses into `RequestFailed` errors by default
    #[must_use]
    pub fn with_error_for_status(mut self, enabled: bool) -> Self {
        self.error_for_status = enabled;
        self
    }
}
