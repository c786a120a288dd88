use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

use super::BoxError;

/// A `Result` alias where the `Err` case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while resolving the proxy, verifying the exit address,
/// or sending a request through Tor.
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) source: Option<BoxError>,
    pub(crate) url: Option<url::Url>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Invalid configuration, URL or request options
    Builder,
    /// None of the candidate ports accepted a probe connection
    ProxyUnavailable,
    /// The IP-echo comparison did not confirm a changed address
    ConnectionNotVerified,
    /// Transport failure: proxy handshake, TLS, HTTP protocol
    Request,
    /// The call exceeded its timeout
    Timeout,
    /// A redirect could not be followed: bad `Location` or too many hops
    Redirect,
    /// Error status with raise-on-error semantics requested
    Status(StatusCode),
    /// Response body could not be decoded
    Decode,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner { kind, source: None, url: None }),
        }
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.inner.url = Some(url);
        self
    }

    /// The classification of this error.
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&url::Url> {
        self.inner.url.as_ref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("torq::Error");

        f.field("kind", &self.inner.kind);

        if let Some(source) = &self.inner.source {
            f.field("source", source);
        }
        if let Some(url) = &self.inner.url {
            f.field("url", url);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Builder => f.write_str("builder error")?,
            Kind::ProxyUnavailable => f.write_str("no Tor SOCKS proxy is listening")?,
            Kind::ConnectionNotVerified => {
                f.write_str("Tor connection not verified: exit address did not change")?;
            }
            Kind::Request => f.write_str("error sending request")?,
            Kind::Timeout => f.write_str("request timed out")?,
            Kind::Redirect => f.write_str("error following redirect")?,
            Kind::Decode => f.write_str("error decoding response body")?,
            Kind::Status(code) => {
                let prefix = if code.is_client_error() {
                    "HTTP status client error"
                } else {
                    "HTTP status server error"
                };
                write!(f, "{prefix} ({code})")?;
            }
        }

        if let Some(url) = &self.inner.url {
            write!(f, " for url ({url})")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}
