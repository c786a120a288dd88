//! Buffered HTTP response
//!
//! The body is read to the end before the call returns, so a `Response` is
//! plain data: no connection is held once the caller has it.

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{self, Result};

/// A response received through the proxy.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    url: Url,
    body: Bytes,
}

impl Response {
    pub(crate) fn new(
        status: StatusCode,
        version: Version,
        headers: HeaderMap,
        url: Url,
        body: Bytes,
    ) -> Self {
        Self {
            status,
            version,
            headers,
            url,
            body,
        }
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The final URL, after any redirects.
    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// True for 2xx and 3xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success() || self.status.is_redirection()
    }

    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as text; invalid UTF-8 sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| error::decode(e).with_url(self.url.clone()))
    }

    /// Turn a 4xx or 5xx response into a `Status` error.
    ///
    /// # Errors
    ///
    /// Returns a `Status` error carrying the code and URL for error statuses.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_client_error() || self.status.is_server_error() {
            Err(error::status_code(self.url, self.status))
        } else {
            Ok(self)
        }
    }
}
