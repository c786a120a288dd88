//! Client configuration
//!
//! `TorConfig` carries every knob the resolver, verifier and transport read:
//! candidate ports, timeouts, the IP-echo endpoint and request defaults.
//! It is passed explicitly into constructors; there is no global default.

pub mod builders;
pub mod env;
pub mod types;
pub mod validation;

pub use types::{
    DEFAULT_IP_CHECK_URL, DEFAULT_MAX_REDIRECTS, DEFAULT_PORTS, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_TIMEOUT, TOR_BROWSER_PORT, TOR_SERVICE_PORT, TorConfig,
};
pub use validation::{ConfigError, ConfigResult};
