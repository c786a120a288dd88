//! Configuration validation

use std::time::Duration;

use super::types::TorConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("port 0 is not a valid SOCKS port")]
    ZeroPort,

    #[error("invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("IP check URL must be http or https, got {0}")]
    InvalidIpCheckUrl(String),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

impl TorConfig {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - the candidate port list contains port 0
    ///
    /// An empty port list is valid here: resolution reports it as
    /// `ProxyUnavailable`, like any list with nothing listening.
    /// - a timeout is zero
    /// - the IP check URL is not http(s)
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ports.contains(&0) {
            return Err(ConfigError::ZeroPort);
        }
        validate_timeout(self.timeout, "timeout")?;
        validate_timeout(self.probe_timeout, "probe timeout")?;
        match self.ip_check_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidIpCheckUrl(other.to_string())),
        }
    }
}

fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
    if timeout.is_zero() {
        return Err(ConfigError::InvalidTimeout(format!("{name} cannot be zero")));
    }
    Ok(())
}
