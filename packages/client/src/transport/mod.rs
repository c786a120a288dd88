//! Blocking HTTP/1.1 transport
//!
//! Each call opens a fresh connection along a [`Route`], performs one
//! request/response exchange with hyper, reads the whole body and closes
//! the connection. Redirects are followed along the same route, one
//! connection per hop. The async work runs on a current-thread runtime owned
//! by the transport, so every public call blocks and is bounded by a single
//! deadline covering connect, proxy handshake, TLS, body and every hop.

use std::time::Duration;

use bytes::Bytes;
use http::header::{HOST, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::runtime::Runtime;
use tokio_rustls::TlsConnector;
use url::Url;

use crate::config::TorConfig;
use crate::connect::{self, Route, tls};
use crate::error::{self, Error, Result};
use crate::http::Response;
use crate::redirect;

/// A request ready to go on the wire.
#[derive(Debug)]
pub(crate) struct Outgoing {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Outgoing {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

pub(crate) struct Transport {
    runtime: Runtime,
    tls: TlsConnector,
    user_agent: HeaderValue,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub fn new(config: &TorConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(error::builder)?;
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(error::builder)?;

        Ok(Self {
            runtime,
            tls: tls::connector(),
            user_agent,
        })
    }

    /// Send `outgoing` along `route`, failing with `Timeout` past `timeout`.
    ///
    /// Up to `max_redirects` redirects are followed; with `0` a redirect
    /// response is returned as-is.
    pub fn execute(
        &self,
        outgoing: Outgoing,
        route: Route,
        timeout: Duration,
        max_redirects: usize,
    ) -> Result<Response> {
        let url = outgoing.url.clone();
        tracing::debug!("{} {} ({:?})", outgoing.method, url, route);

        self.runtime.block_on(async {
            let chain = self.follow_chain(outgoing, route, max_redirects);
            match tokio::time::timeout(timeout, chain).await {
                Ok(result) => result,
                Err(_) => Err(error::timeout().with_url(url)),
            }
        })
    }

    async fn follow_chain(
        &self,
        mut outgoing: Outgoing,
        route: Route,
        max_redirects: usize,
    ) -> Result<Response> {
        let mut hops = 0;
        loop {
            let response = self.exchange(&outgoing, route).await?;
            if max_redirects == 0 {
                return Ok(response);
            }
            let status = response.status();
            let next = match redirect::next_url(status, response.headers(), &outgoing.url) {
                Some(next) => next?,
                None => return Ok(response),
            };

            if hops == max_redirects {
                return Err(error::redirect(format!("stopped after {max_redirects} redirects"))
                    .with_url(next));
            }
            hops += 1;

            tracing::debug!("{} redirect {} -> {}", status, outgoing.url, next);
            outgoing = redirect::follow(&outgoing, status, next);
        }
    }

    async fn exchange(&self, outgoing: &Outgoing, route: Route) -> Result<Response> {
        let url = outgoing.url.clone();
        let io = connect::connect(&url, route, &self.tls).await?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(io))
            .await
            .map_err(|e| error::request(e).with_url(url.clone()))?;
        tokio::pin!(conn);

        let request = self.build_request(outgoing)?;
        let exchange = async {
            let response = sender
                .send_request(request)
                .await
                .map_err(|e| error::request(e).with_url(url.clone()))?;

            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| error::request(e).with_url(url.clone()))?
                .to_bytes();

            Ok::<_, Error>(Response::new(
                parts.status,
                parts.version,
                parts.headers,
                url.clone(),
                body,
            ))
        };
        tokio::pin!(exchange);

        // The connection is driven here rather than spawned, so it is
        // dropped (and the socket closed) when this call returns.
        tokio::select! {
            result = &mut exchange => result,
            closed = &mut conn => {
                if let Err(e) = closed {
                    return Err(error::request(e).with_url(url.clone()));
                }
                exchange.await
            }
        }
    }

    fn build_request(&self, outgoing: &Outgoing) -> Result<http::Request<Full<Bytes>>> {
        let url = &outgoing.url;

        let mut request = http::Request::builder()
            .method(outgoing.method.clone())
            .uri(origin_form(url))
            .body(Full::new(outgoing.body.clone()))
            .map_err(|e| error::builder(e).with_url(url.clone()))?;

        let request_headers = request.headers_mut();
        request_headers.extend(outgoing.headers.clone());
        if !request_headers.contains_key(HOST) {
            let host = host_header(url).map_err(|e| e.with_url(url.clone()))?;
            request_headers.insert(HOST, host);
        }
        if !request_headers.contains_key(USER_AGENT) {
            request_headers.insert(USER_AGENT, self.user_agent.clone());
        }

        Ok(request)
    }
}

/// Path and query, as sent on an HTTP/1.1 request line.
fn origin_form(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn host_header(url: &Url) -> Result<HeaderValue> {
    let host = url.host_str().ok_or_else(|| error::builder("URL has no host"))?;
    let value = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    HeaderValue::from_str(&value).map_err(error::builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_form_keeps_query() {
        let url = Url::parse("http://example.com/a/b?x=1&y=2").expect("valid url");
        assert_eq!(origin_form(&url), "/a/b?x=1&y=2");

        let bare = Url::parse("http://example.com").expect("valid url");
        assert_eq!(origin_form(&bare), "/");
    }

    #[test]
    fn host_header_includes_non_default_port() {
        let url = Url::parse("http://example.com:8080/").expect("valid url");
        assert_eq!(host_header(&url).expect("host"), "example.com:8080");

        let url = Url::parse("https://example.com:443/").expect("valid url");
        assert_eq!(host_header(&url).expect("host"), "example.com");

        let url = Url::parse("http://[::1]:81/").expect("valid url");
        assert_eq!(host_header(&url).expect("host"), "[::1]:81");
    }

    #[test]
    fn request_carries_default_user_agent_and_caller_headers() {
        let transport = Transport::new(&TorConfig::default()).expect("transport");
        let mut outgoing = Outgoing::get(Url::parse("http://example.com/ip").expect("valid url"));
        outgoing
            .headers
            .insert("x-probe", HeaderValue::from_static("1"));

        let request = transport.build_request(&outgoing).expect("request");
        assert_eq!(request.uri(), "/ip");
        assert_eq!(request.headers()[HOST], "example.com");
        assert_eq!(request.headers()["x-probe"], "1");
        assert!(
            request.headers()[USER_AGENT]
                .to_str()
                .expect("ascii")
                .starts_with("torq/")
        );
    }
}
