//! Redirect Handling
//!
//! 301, 302, 303, 307 and 308 responses with a `Location` header are followed
//! along the same route as the original request, up to the configured number
//! of hops. POST becomes GET (without a body) on 301/302, and every method
//! except HEAD becomes GET on 303. Credentials are dropped when a redirect
//! leaves the original host.

use bytes::Bytes;
use http::header::{
    AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST, LOCATION, PROXY_AUTHORIZATION,
    TRANSFER_ENCODING,
};
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::{self, Result};
use crate::transport::Outgoing;

pub(crate) fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// The target of a redirect response, resolved against `current`.
///
/// `None` when the response is not a redirect or carries no `Location`; such
/// responses are handed to the caller unchanged.
pub(crate) fn next_url(
    status: StatusCode,
    headers: &HeaderMap,
    current: &Url,
) -> Option<Result<Url>> {
    if !is_redirect(status) {
        return None;
    }
    let location = headers.get(LOCATION)?;

    let next = location
        .to_str()
        .map_err(error::redirect)
        .and_then(|location| current.join(location).map_err(error::redirect))
        .and_then(|next| {
            if matches!(next.scheme(), "http" | "https") && next.has_host() {
                Ok(next)
            } else {
                Err(error::redirect(format!("unsupported redirect target {next}")))
            }
        });

    Some(next.map_err(|e| e.with_url(current.clone())))
}

/// Rewrite `previous` into the request sent to `next`.
pub(crate) fn follow(previous: &Outgoing, status: StatusCode, next: Url) -> Outgoing {
    let mut method = previous.method.clone();
    let mut headers = previous.headers.clone();
    let mut body = previous.body.clone();

    let to_get = match status {
        StatusCode::SEE_OTHER => method != Method::HEAD,
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => method == Method::POST,
        _ => false,
    };
    if to_get {
        method = Method::GET;
        body = Bytes::new();
        for name in [CONTENT_TYPE, CONTENT_LENGTH, TRANSFER_ENCODING] {
            headers.remove(name);
        }
    }

    if leaves_origin(&previous.url, &next) {
        for name in [AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, HOST] {
            headers.remove(name);
        }
    }

    Outgoing {
        method,
        url: next,
        headers,
        body,
    }
}

fn leaves_origin(previous: &Url, next: &Url) -> bool {
    next.host_str() != previous.host_str()
        || next.port_or_known_default() != previous.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid url")
    }

    fn located(location: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static(location));
        headers
    }

    fn post(to: &str) -> Outgoing {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        Outgoing {
            method: Method::POST,
            url: url(to),
            headers,
            body: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn relative_locations_resolve_against_the_current_url() {
        let current = url("http://example.com/a/b?x=1");
        let next = next_url(StatusCode::FOUND, &located("../c"), &current)
            .expect("redirect")
            .expect("valid location");
        assert_eq!(next.as_str(), "http://example.com/c");

        let next = next_url(
            StatusCode::MOVED_PERMANENTLY,
            &located("https://other.org/"),
            &current,
        )
        .expect("redirect")
        .expect("valid location");
        assert_eq!(next.host_str(), Some("other.org"));
    }

    #[test]
    fn non_redirects_and_missing_locations_are_left_alone() {
        let current = url("http://example.com/");
        assert!(next_url(StatusCode::OK, &located("/x"), &current).is_none());
        assert!(next_url(StatusCode::NOT_MODIFIED, &located("/x"), &current).is_none());
        assert!(next_url(StatusCode::FOUND, &HeaderMap::new(), &current).is_none());
    }

    #[test]
    fn non_http_locations_are_redirect_errors() {
        let current = url("http://example.com/");
        let err = next_url(StatusCode::FOUND, &located("ftp://example.com/file"), &current)
            .expect("redirect")
            .expect_err("ftp target");
        assert!(err.is_redirect());
        assert_eq!(err.url(), Some(&current));
    }

    #[test]
    fn see_other_and_found_turn_post_into_get() {
        for status in [StatusCode::SEE_OTHER, StatusCode::FOUND, StatusCode::MOVED_PERMANENTLY] {
            let next = follow(&post("http://example.com/form"), status, url("http://example.com/ok"));
            assert_eq!(next.method, Method::GET);
            assert!(next.body.is_empty());
            assert!(!next.headers.contains_key(CONTENT_TYPE));
            assert_eq!(next.url.path(), "/ok");
        }
    }

    #[test]
    fn temporary_and_permanent_keep_method_and_body() {
        for status in [StatusCode::TEMPORARY_REDIRECT, StatusCode::PERMANENT_REDIRECT] {
            let next = follow(&post("http://example.com/form"), status, url("http://example.com/v2"));
            assert_eq!(next.method, Method::POST);
            assert_eq!(next.body, Bytes::from_static(b"{}"));
            assert_eq!(next.headers[CONTENT_TYPE], "application/json");
        }
    }

    #[test]
    fn credentials_stay_on_the_original_host() {
        let original = post("http://example.com/a");

        let same = follow(&original, StatusCode::TEMPORARY_REDIRECT, url("http://example.com/b"));
        assert!(same.headers.contains_key(AUTHORIZATION));

        let other = follow(
            &original,
            StatusCode::TEMPORARY_REDIRECT,
            url("http://example.com:8080/b"),
        );
        assert!(!other.headers.contains_key(AUTHORIZATION));
    }
}
