use url::Url;

use crate::error::{self, Error};

/// A trait to try to convert some type into a `Url`.
///
/// This trait is "sealed", such that only types within torq can
/// implement it.
pub trait IntoUrl: IntoUrlSealed {}

impl IntoUrl for Url {}
impl IntoUrl for String {}
impl IntoUrl for &str {}
impl IntoUrl for &String {}
impl IntoUrl for &Url {}

pub trait IntoUrlSealed {
    // Besides parsing as a valid `Url`, the `Url` must be http(s) with a host,
    // since it is sent through the proxy as an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns a builder `Error` if:
    /// - the URL string is malformed
    /// - the scheme is not `http` or `https`
    /// - the URL has no host
    fn into_url(self) -> Result<Url, Error>;
}

impl IntoUrlSealed for Url {
    fn into_url(self) -> Result<Url, Error> {
        match self.scheme() {
            "http" | "https" if self.has_host() => Ok(self),
            "http" | "https" => Err(error::builder(format!("URL has no host: {self}")).with_url(self)),
            _ => Err(error::builder(format!("Bad scheme in URL: {self}")).with_url(self)),
        }
    }
}

impl IntoUrlSealed for &Url {
    fn into_url(self) -> Result<Url, Error> {
        self.clone().into_url()
    }
}

impl IntoUrlSealed for &str {
    fn into_url(self) -> Result<Url, Error> {
        Url::parse(self).map_err(error::builder)?.into_url()
    }
}

impl IntoUrlSealed for &String {
    fn into_url(self) -> Result<Url, Error> {
        (&**self).into_url()
    }
}

impl IntoUrlSealed for String {
    fn into_url(self) -> Result<Url, Error> {
        (&*self).into_url()
    }
}
