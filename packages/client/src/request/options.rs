//! Per-request options
//!
//! `RequestOptions` is the structured stand-in for keyword passthrough:
//! headers, query parameters, a JSON/form/raw body, a timeout override,
//! raise-on-error and a redirect switch. Builder methods never fail; the first invalid input is
//! kept and reported when the request is sent.

use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::error::{self, Error, Result};

/// Request body payload, already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// `application/json`
    Json(Bytes),
    /// `application/x-www-form-urlencoded`
    Form(Bytes),
    /// Raw bytes with an optional content type
    Raw {
        bytes: Bytes,
        content_type: Option<HeaderValue>,
    },
}

impl Body {
    pub fn bytes(&self) -> &Bytes {
        match self {
            Body::Json(bytes) | Body::Form(bytes) | Body::Raw { bytes, .. } => bytes,
        }
    }

    pub fn content_type(&self) -> Option<HeaderValue> {
        match self {
            Body::Json(_) => Some(HeaderValue::from_static("application/json")),
            Body::Form(_) => Some(HeaderValue::from_static(
                "application/x-www-form-urlencoded",
            )),
            Body::Raw { content_type, .. } => content_type.clone(),
        }
    }
}

/// Options forwarded to a single `get`/`post`/`put`/`delete` call.
#[derive(Debug, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Body>,
    timeout: Option<Duration>,
    error_for_status: Option<bool>,
    follow_redirects: Option<bool>,
    error: Option<Error>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. Repeated names are appended, not replaced.
    ///
    /// # Examples
    /// ```
    /// use torq_client::RequestOptions;
    ///
    /// let options = RequestOptions::new()
    ///     .header("accept", "application/json")
    ///     .header("x-request-id", "42");
    /// assert_eq!(options.headers_ref().len(), 2);
    /// ```
    #[must_use]
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        let name = HeaderName::try_from(key).map_err(Into::<http::Error>::into);
        let value = HeaderValue::try_from(value).map_err(Into::<http::Error>::into);
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            (Err(e), _) | (_, Err(e)) => self.fail(error::builder(e)),
        }
        self
    }

    /// Merge a prepared header map.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in &headers {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Append query parameters serialized from `query`.
    ///
    /// # Examples
    /// ```
    /// use torq_client::RequestOptions;
    ///
    /// let options = RequestOptions::new().query(&[("q", "tor"), ("page", "2")]);
    /// assert_eq!(options.query_pairs().len(), 2);
    /// ```
    #[must_use]
    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        match serde_urlencoded::to_string(query) {
            Ok(encoded) => self.query.extend(
                url::form_urlencoded::parse(encoded.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            ),
            Err(e) => self.fail(error::builder(e)),
        }
        self
    }

    /// Send `json` as a JSON body.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, json: &T) -> Self {
        match serde_json::to_vec(json) {
            Ok(bytes) => self.body = Some(Body::Json(Bytes::from(bytes))),
            Err(e) => self.fail(error::builder(e)),
        }
        self
    }

    /// Send `form` as a urlencoded form body.
    #[must_use]
    pub fn form<T: Serialize + ?Sized>(mut self, form: &T) -> Self {
        match serde_urlencoded::to_string(form) {
            Ok(encoded) => self.body = Some(Body::Form(Bytes::from(encoded))),
            Err(e) => self.fail(error::builder(e)),
        }
        self
    }

    /// Send raw bytes without a content type.
    #[must_use]
    pub fn body(mut self, bytes: impl Into<Bytes>) -> Self {
        self.body = Some(Body::Raw {
            bytes: bytes.into(),
            content_type: None,
        });
        self
    }

    /// Send raw bytes labelled with `content_type`.
    ///
    /// A `content-type` set through [`RequestOptions::header`] still wins.
    ///
    /// # Examples
    /// ```
    /// use torq_client::RequestOptions;
    /// use torq_client::request::Body;
    ///
    /// let options = RequestOptions::new().body_with_type("<ping/>", "application/xml");
    /// let content_type = options.body_ref().and_then(Body::content_type);
    /// assert_eq!(content_type.expect("typed body"), "application/xml");
    /// ```
    #[must_use]
    pub fn body_with_type<V>(mut self, bytes: impl Into<Bytes>, content_type: V) -> Self
    where
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        match HeaderValue::try_from(content_type) {
            Ok(content_type) => {
                self.body = Some(Body::Raw {
                    bytes: bytes.into(),
                    content_type: Some(content_type),
                });
            }
            Err(e) => self.fail(error::builder(Into::<http::Error>::into(e))),
        }
        self
    }

    /// Override the configured timeout for this call.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the configured raise-on-error behaviour for this call.
    #[must_use]
    pub fn error_for_status(mut self, enabled: bool) -> Self {
        self.error_for_status = Some(enabled);
        self
    }

    /// Follow redirects (up to the configured limit) or return 3xx
    /// responses as-is. Redirects are followed by default.
    #[must_use]
    pub fn follow_redirects(mut self, enabled: bool) -> Self {
        self.follow_redirects = Some(enabled);
        self
    }

    pub fn headers_ref(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body_ref(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn error_for_status_override(&self) -> Option<bool> {
        self.error_for_status
    }

    pub fn follow_redirects_override(&self) -> Option<bool> {
        self.follow_redirects
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Apply query parameters to `url` and split into the parts the
    /// transport needs, surfacing any deferred builder error.
    pub(crate) fn prepare(self, url: &mut Url) -> Result<PreparedOptions> {
        if let Some(err) = self.error {
            return Err(err.with_url(url.clone()));
        }

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        let mut headers = self.headers;
        if let Some(content_type) = self.body.as_ref().and_then(Body::content_type)
            && !headers.contains_key(CONTENT_TYPE)
        {
            headers.insert(CONTENT_TYPE, content_type);
        }

        Ok(PreparedOptions {
            headers,
            body: self.body.map(|body| body.bytes().clone()).unwrap_or_default(),
            timeout: self.timeout,
            error_for_status: self.error_for_status,
            follow_redirects: self.follow_redirects,
        })
    }
}

/// Options after validation, ready for the transport.
#[derive(Debug)]
pub(crate) struct PreparedOptions {
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Option<Duration>,
    pub error_for_status: Option<bool>,
    pub follow_redirects: Option<bool>,
}
