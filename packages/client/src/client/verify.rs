//! Exit address verification
//!
//! Fetches the caller's apparent address from the IP-echo endpoint twice,
//! once directly and once through the proxy, and compares the answers.

use serde_json::Value;

use super::TorClient;
use super::state::ConnectionState;
use crate::connect::Route;
use crate::error::{self, Result};
use crate::transport::Outgoing;

/// Addresses observed by the last verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpCheck {
    /// Address seen without the proxy, if the fetch succeeded
    pub direct: Option<String>,
    /// Address seen through the proxy, if the fetch succeeded
    pub proxied: Option<String>,
}

impl IpCheck {
    /// Both fetches succeeded and the addresses differ.
    pub fn is_verified(&self) -> bool {
        matches!((&self.direct, &self.proxied), (Some(direct), Some(proxied)) if direct != proxied)
    }

    fn failure_reason(&self) -> String {
        match (&self.direct, &self.proxied) {
            (None, _) => "direct IP lookup failed".to_string(),
            (_, None) => "IP lookup through the proxy failed".to_string(),
            (Some(ip), Some(_)) => format!("exit address {ip} matches the direct address"),
        }
    }
}

impl TorClient {
    /// Check that traffic through the proxy leaves from a different address.
    ///
    /// Resolves the proxy port if needed, then compares the IP-echo answers
    /// fetched directly and through the proxy. A failed fetch, an error status
    /// or an unreadable body counts as `false`, so `false` means "not verified
    /// this time" rather than "Tor is broken".
    ///
    /// # Errors
    ///
    /// Returns `ProxyUnavailable` if no candidate port has a listener.
    pub fn check_tor_connection(&mut self) -> Result<bool> {
        let proxy = self.proxy_addr()?;

        let check = IpCheck {
            direct: self.fetch_ip(Route::Direct),
            proxied: self.fetch_ip(Route::Socks(proxy)),
        };
        let verified = check.is_verified();

        if verified {
            tracing::info!(
                "Connected to Tor through {}, exit IP {}",
                proxy,
                check.proxied.as_deref().unwrap_or_default()
            );
            self.state = ConnectionState::Verified;
        } else {
            tracing::warn!("Tor connection not verified: {}", check.failure_reason());
            self.state = ConnectionState::Unverified;
        }

        self.last_check = Some(check);
        Ok(verified)
    }

    /// Like [`TorClient::check_tor_connection`], with `false` turned into an error.
    ///
    /// # Errors
    ///
    /// * `ProxyUnavailable` if no candidate port has a listener
    /// * `ConnectionNotVerified` if the exit address could not be confirmed
    pub fn verify(&mut self) -> Result<()> {
        if self.check_tor_connection()? {
            return Ok(());
        }

        let reason = self
            .last_check
            .as_ref()
            .map(IpCheck::failure_reason)
            .unwrap_or_default();
        Err(error::not_verified(reason))
    }

    fn fetch_ip(&self, route: Route) -> Option<String> {
        let url = self.config.ip_check_url.clone();
        let response = match self
            .transport
            .execute(
                Outgoing::get(url.clone()),
                route,
                self.config.timeout,
                self.config.max_redirects,
            )
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("IP lookup ({:?}) failed: {}", route, e);
                return None;
            }
        };

        let ip = parse_ip(response.bytes());
        if ip.is_none() {
            tracing::warn!("IP lookup ({:?}) returned an unreadable body from {}", route, url);
        }
        ip
    }
}

/// Extract the address from an IP-echo body.
///
/// Accepts `{"ip": "..."}`, a bare JSON string, or a single plain-text token.
pub fn parse_ip(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?.trim();
    if text.is_empty() {
        return None;
    }

    let ip = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map.get("ip").and_then(Value::as_str)?.trim().to_string(),
        Ok(Value::String(ip)) => ip.trim().to_string(),
        Ok(_) => return None,
        Err(_) => {
            let plain = text.len() <= 64
                && !text.contains(char::is_whitespace)
                && !text.contains(['<', '{', '[']);
            if !plain {
                return None;
            }
            text.to_string()
        }
    };

    (!ip.is_empty()).then_some(ip)
}
