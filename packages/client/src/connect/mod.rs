//! Connection establishment
//!
//! Opens the byte stream a request is written to: a TCP connection, either
//! straight to the origin or through the SOCKS5 proxy, wrapped in TLS for
//! `https` URLs.

pub mod tls;

use std::net::{IpAddr, SocketAddr};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use url::{Host, Url};

use crate::error::{self, Result};
use crate::proxy::{TargetAddr, socks5_handshake};

/// How a request reaches its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Straight to the origin, no proxy.
    Direct,
    /// Through the SOCKS5 proxy at the given address.
    Socks(SocketAddr),
}

pub(crate) trait Io: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Io for T {}

pub(crate) type BoxedIo = Box<dyn Io>;

/// Open a stream to the origin of `url` along `route`.
pub(crate) async fn connect(url: &Url, route: Route, tls: &TlsConnector) -> Result<BoxedIo> {
    let host = url
        .host()
        .ok_or_else(|| error::builder("URL has no host").with_url(url.clone()))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| error::builder("URL has no port").with_url(url.clone()))?;

    let stream = match route {
        Route::Direct => connect_direct(&host, port).await,
        Route::Socks(proxy) => connect_via_socks(proxy, &host, port).await,
    }
    .map_err(|e| e.with_url(url.clone()))?;

    if url.scheme() == "https" {
        let stream = tls::handshake(tls, &host, stream)
            .await
            .map_err(|e| e.with_url(url.clone()))?;
        Ok(Box::new(stream))
    } else {
        Ok(Box::new(stream))
    }
}

async fn connect_direct(host: &Host<&str>, port: u16) -> Result<TcpStream> {
    let stream = match host {
        Host::Domain(domain) => TcpStream::connect((*domain, port)).await,
        Host::Ipv4(ip) => TcpStream::connect(SocketAddr::new(IpAddr::V4(*ip), port)).await,
        Host::Ipv6(ip) => TcpStream::connect(SocketAddr::new(IpAddr::V6(*ip), port)).await,
    }
    .map_err(error::request)?;

    configure_tcp_socket(&stream);
    Ok(stream)
}

async fn connect_via_socks(proxy: SocketAddr, host: &Host<&str>, port: u16) -> Result<TcpStream> {
    let mut stream = TcpStream::connect(proxy).await.map_err(error::request)?;
    configure_tcp_socket(&stream);

    socks5_handshake(&mut stream, &TargetAddr::from(host.clone()), port)
        .await
        .map_err(error::request)?;

    tracing::debug!("SOCKS5 tunnel to {}:{} open via {}", host, port, proxy);
    Ok(stream)
}

fn configure_tcp_socket(stream: &TcpStream) {
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("Failed to set TCP_NODELAY: {e}");
    }
}
