//! SOCKS5 client handshake
//!
//! No-auth SOCKS5 CONNECT. Hostnames are sent as-is (address type 0x03) so
//! the proxy resolves them, which keeps DNS lookups inside Tor.

use std::io;
use std::net::IpAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const SOCKS_VERSION: u8 = 0x05;
const NO_AUTH: u8 = 0x00;
const CMD_CONNECT: u8 = 0x01;
const ATYP_IPV4: u8 = 0x01;
const ATYP_DOMAIN: u8 = 0x03;
const ATYP_IPV6: u8 = 0x04;

#[derive(Debug, thiserror::Error)]
pub enum SocksError {
    #[error("SOCKS5 I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("proxy answered with SOCKS version {0}, expected 5")]
    BadVersion(u8),

    #[error("proxy refused no-auth negotiation (method {0:#04x})")]
    AuthRejected(u8),

    #[error("SOCKS5 connection rejected: {}", reply_message(.0))]
    Rejected(u8),

    #[error("invalid SOCKS5 address type in response: {0}")]
    BadAddressType(u8),

    #[error("hostname too long for SOCKS5: {0} bytes")]
    HostTooLong(usize),
}

/// Destination of a CONNECT request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAddr {
    Domain(String),
    Ip(IpAddr),
}

impl From<url::Host<&str>> for TargetAddr {
    fn from(host: url::Host<&str>) -> Self {
        match host {
            url::Host::Domain(domain) => TargetAddr::Domain(domain.to_string()),
            url::Host::Ipv4(ip) => TargetAddr::Ip(IpAddr::V4(ip)),
            url::Host::Ipv6(ip) => TargetAddr::Ip(IpAddr::V6(ip)),
        }
    }
}

/// Encode a CONNECT request for `target:port`.
pub fn connect_request(target: &TargetAddr, port: u16) -> Result<Vec<u8>, SocksError> {
    let mut request = vec![SOCKS_VERSION, CMD_CONNECT, 0x00];

    match target {
        TargetAddr::Ip(IpAddr::V4(ipv4)) => {
            request.push(ATYP_IPV4);
            request.extend_from_slice(&ipv4.octets());
        }
        TargetAddr::Ip(IpAddr::V6(ipv6)) => {
            request.push(ATYP_IPV6);
            request.extend_from_slice(&ipv6.octets());
        }
        TargetAddr::Domain(domain) => {
            let len = u8::try_from(domain.len()).map_err(|_| SocksError::HostTooLong(domain.len()))?;
            request.push(ATYP_DOMAIN);
            request.push(len);
            request.extend_from_slice(domain.as_bytes());
        }
    }

    request.extend_from_slice(&port.to_be_bytes());
    Ok(request)
}

/// Run the SOCKS5 handshake on `stream`, leaving it connected to the target.
pub async fn socks5_handshake<S>(
    stream: &mut S,
    target: &TargetAddr,
    port: u16,
) -> Result<(), SocksError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // Version 5, 1 method, no auth
    stream.write_all(&[SOCKS_VERSION, 0x01, NO_AUTH]).await?;

    let mut auth_response = [0u8; 2];
    stream.read_exact(&mut auth_response).await?;
    if auth_response[0] != SOCKS_VERSION {
        return Err(SocksError::BadVersion(auth_response[0]));
    }
    if auth_response[1] != NO_AUTH {
        return Err(SocksError::AuthRejected(auth_response[1]));
    }

    let request = connect_request(target, port)?;
    stream.write_all(&request).await?;

    let mut response = [0u8; 4];
    stream.read_exact(&mut response).await?;
    if response[0] != SOCKS_VERSION {
        return Err(SocksError::BadVersion(response[0]));
    }
    if response[1] != 0x00 {
        return Err(SocksError::Rejected(response[1]));
    }

    // Skip bound address (variable length) and port
    match response[3] {
        ATYP_IPV4 => {
            let mut addr = [0u8; 6];
            stream.read_exact(&mut addr).await?;
        }
        ATYP_DOMAIN => {
            let len = stream.read_u8().await?;
            let mut domain_and_port = vec![0u8; usize::from(len) + 2];
            stream.read_exact(&mut domain_and_port).await?;
        }
        ATYP_IPV6 => {
            let mut addr = [0u8; 18];
            stream.read_exact(&mut addr).await?;
        }
        other => return Err(SocksError::BadAddressType(other)),
    }

    Ok(())
}

fn reply_message(code: &u8) -> String {
    let reason = match *code {
        0x01 => "general SOCKS server failure",
        0x02 => "connection not allowed by ruleset",
        0x03 => "network unreachable",
        0x04 => "host unreachable",
        0x05 => "connection refused",
        0x06 => "TTL expired",
        0x07 => "command not supported",
        0x08 => "address type not supported",
        _ => "unknown reply code",
    };
    format!("{reason} ({code:#04x})")
}
