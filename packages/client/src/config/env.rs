//! Environment overrides
//!
//! Reads `TORQ_PORTS`, `TORQ_TIMEOUT_SECS`, `TORQ_PROXY_HOST` and
//! `TORQ_IP_CHECK_URL` on top of the defaults.

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use url::Url;

use super::types::TorConfig;
use super::validation::{ConfigError, ConfigResult};

pub const PORTS_VAR: &str = "TORQ_PORTS";
pub const TIMEOUT_VAR: &str = "TORQ_TIMEOUT_SECS";
pub const PROXY_HOST_VAR: &str = "TORQ_PROXY_HOST";
pub const IP_CHECK_URL_VAR: &str = "TORQ_IP_CHECK_URL";

impl TorConfig {
    /// Default configuration with overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnv` if a variable is set but malformed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Default configuration with overrides from an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnv` if a value is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PORTS_VAR) {
            config.ports = parse_ports(&raw).ok_or_else(|| invalid(PORTS_VAR, &raw))?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| invalid(TIMEOUT_VAR, &raw))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(PROXY_HOST_VAR) {
            config.proxy_host = raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| invalid(PROXY_HOST_VAR, &raw))?;
        }
        if let Some(raw) = lookup(IP_CHECK_URL_VAR) {
            config.ip_check_url =
                Url::parse(raw.trim()).map_err(|_| invalid(IP_CHECK_URL_VAR, &raw))?;
        }

        Ok(config)
    }
}

fn parse_ports(raw: &str) -> Option<Vec<u16>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u16>().ok())
        .collect()
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    }
}
