//! Fail-fast wrappers
//!
//! Each wrapper builds a fresh client, verifies the Tor exit and only then
//! hands the client to the wrapped function. When the proxy is missing or the
//! exit address cannot be confirmed, the function is never invoked.

use std::fmt;

use torq_client::{Result, TorClient, TorConfig};

/// A function gated on a verified Tor connection.
///
/// The wrapped function receives the verified client first and the caller's
/// arguments unchanged. Every [`TorRequest::call`] builds and verifies a new
/// client, so no state leaks between calls.
#[derive(Clone)]
pub struct TorRequest<F> {
    f: F,
    config: TorConfig,
}

/// Wrap `f` so that it only runs over a verified Tor connection.
///
/// Use a tuple for `A` to forward several arguments.
pub fn tor_request<F>(f: F) -> TorRequest<F> {
    TorRequest {
        f,
        config: TorConfig::default(),
    }
}

impl<F> TorRequest<F> {
    /// Use `config` for the clients built by this wrapper.
    #[must_use]
    pub fn with_config(mut self, config: TorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &TorConfig {
        &self.config
    }

    /// Verify a new client and invoke the wrapped function with it.
    ///
    /// # Errors
    ///
    /// * `Builder` for an invalid configuration
    /// * `ProxyUnavailable` if no candidate port has a listener
    /// * `ConnectionNotVerified` if the exit address could not be confirmed
    ///
    /// In all three cases the wrapped function is not called. Its own result,
    /// error or not, is returned inside `Ok`.
    pub fn call<A, R>(&self, args: A) -> Result<R>
    where
        F: Fn(&mut TorClient, A) -> R,
    {
        let mut client = verified_client(self.config.clone())?;
        Ok((self.f)(&mut client, args))
    }
}

impl<F> fmt::Debug for TorRequest<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TorRequest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Run `f` once with a verified client built from the default configuration.
///
/// # Errors
///
/// See [`TorRequest::call`].
pub fn with_tor<R, F>(f: F) -> Result<R>
where
    F: FnOnce(&mut TorClient) -> R,
{
    with_tor_config(TorConfig::default(), f)
}

/// Run `f` once with a verified client built from `config`.
///
/// # Errors
///
/// See [`TorRequest::call`].
pub fn with_tor_config<R, F>(config: TorConfig, f: F) -> Result<R>
where
    F: FnOnce(&mut TorClient) -> R,
{
    let mut client = verified_client(config)?;
    Ok(f(&mut client))
}

pub(crate) fn verified_client(config: TorConfig) -> Result<TorClient> {
    let mut client = TorClient::with_config(config)?;

    if let Err(e) = client.verify() {
        log::warn!("Refusing to run request without a verified Tor connection: {e}");
        return Err(e);
    }

    log::debug!(
        "Tor connection verified on port {:?}, exit IP {:?}",
        client.proxy_port(),
        client.exit_ip()
    );
    Ok(client)
}
