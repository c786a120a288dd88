use std::error::Error as StdError;
use std::io;

use http::StatusCode;

use super::helpers::TimedOut;
use super::types::{Error, Kind};

impl Error {
    /// Returns true if the error is from a type Builder.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    /// Returns true if no candidate port had a listening proxy.
    #[must_use]
    pub fn is_proxy_unavailable(&self) -> bool {
        matches!(self.inner.kind, Kind::ProxyUnavailable)
    }

    /// Returns true if exit-address verification failed.
    #[must_use]
    pub fn is_not_verified(&self) -> bool {
        matches!(self.inner.kind, Kind::ConnectionNotVerified)
    }

    /// Returns true for any failure of the HTTP call itself: transport
    /// errors, timeouts, broken redirects, and error statuses under
    /// `error_for_status`.
    #[must_use]
    pub fn is_request_failed(&self) -> bool {
        matches!(
            self.inner.kind,
            Kind::Request | Kind::Timeout | Kind::Redirect | Kind::Status(_)
        )
    }

    /// Returns true if a redirect could not be followed.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self.inner.kind, Kind::Redirect)
    }

    /// Returns true if the error is from `Response::error_for_status`.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self.inner.kind, Kind::Status(_))
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        if matches!(self.inner.kind, Kind::Timeout) {
            return true;
        }

        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            if let Some(hyper_err) = err.downcast_ref::<hyper::Error>()
                && hyper_err.is_timeout()
            {
                return true;
            }
            if let Some(io) = err.downcast_ref::<io::Error>()
                && io.kind() == io::ErrorKind::TimedOut
            {
                return true;
            }
            source = err.source();
        }

        false
    }

    /// Returns true if the error is related to decoding the response's body
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self.inner.kind, Kind::Decode)
    }

    /// Returns the status code, if the error was generated from a response.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.kind {
            Kind::Status(code) => Some(code),
            _ => None,
        }
    }
}
