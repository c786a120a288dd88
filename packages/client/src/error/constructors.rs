use std::net::IpAddr;

use http::StatusCode;

use super::BoxError;
use super::helpers::{NoProxyListening, TimedOut};
use super::types::{Error, Kind};

/// Creates an `Error` for a builder error.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a transport-level request failure.
pub fn request<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Request).with(e.into())
}

/// Creates an `Error` for a redirect that cannot be followed.
pub fn redirect<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Redirect).with(e.into())
}

/// Creates an `Error` for a decode error.
pub fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode).with(e.into())
}

/// Creates an `Error` for a call that exceeded its timeout.
pub fn timeout() -> Error {
    Error::new(Kind::Timeout).with(TimedOut)
}

pub fn status_code(url: url::Url, status: StatusCode) -> Error {
    Error::new(Kind::Status(status)).with_url(url)
}

/// Creates an `Error` for a candidate list with no listening proxy.
pub fn proxy_unavailable(host: IpAddr, ports: &[u16]) -> Error {
    Error::new(Kind::ProxyUnavailable).with(NoProxyListening {
        host,
        ports: ports.to_vec(),
    })
}

/// Creates an `Error` for a failed exit-address verification.
pub fn not_verified<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::ConnectionNotVerified).with(e.into())
}
