//! TLS over an established stream, rustls with the webpki root set.

use std::net::IpAddr;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use url::Host;

use crate::error::{self, Result};

/// Build the connector shared by every request of a client.
pub(crate) fn connector() -> TlsConnector {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let mut config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    TlsConnector::from(Arc::new(config))
}

pub(crate) async fn handshake(
    connector: &TlsConnector,
    host: &Host<&str>,
    stream: TcpStream,
) -> Result<TlsStream<TcpStream>> {
    let server_name: ServerName<'static> = match host {
        Host::Domain(domain) => ServerName::try_from((*domain).to_string())
            .map_err(|e| error::builder(format!("Invalid server name {domain}: {e}")))?,
        Host::Ipv4(ip) => ServerName::IpAddress(IpAddr::V4(*ip).into()),
        Host::Ipv6(ip) => ServerName::IpAddress(IpAddr::V6(*ip).into()),
    };

    connector
        .connect(server_name, stream)
        .await
        .map_err(error::request)
}
