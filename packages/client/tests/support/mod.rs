//! Local fixtures: axum origins on a background runtime and a fake SOCKS5
//! proxy that relays (or redirects) CONNECT requests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Redirect;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::{Value, json};
use torq_client::{TorConfig, Url};

/// Serve `app` on an ephemeral localhost port from a background thread.
pub fn spawn_http(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind http fixture");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().expect("fixture addr");

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fixture runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve fixture");
        });
    });

    addr
}

/// An IP-echo service answering `{"ip": ip}` on `/ip`.
pub fn ip_echo(ip: &'static str) -> SocketAddr {
    spawn_http(Router::new().route("/ip", get(move || async move { Json(json!({ "ip": ip })) })))
}

/// An IP-echo service answering plain text on `/ip`.
pub fn plain_ip_echo(ip: &'static str) -> SocketAddr {
    spawn_http(Router::new().route("/ip", get(move || async move { format!("{ip}\n") })))
}

/// An origin with `/echo`, `/slow`, `/status/:code` and `/redirect/*` routes.
///
/// `/redirect/see-other` answers 303 and `/redirect/temporary` 307, both
/// pointing at `/echo`; `/redirect/loop` points at itself.
pub fn origin() -> SocketAddr {
    spawn_http(
        Router::new()
            .route("/echo", any(echo))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    "late"
                }),
            )
            .route(
                "/status/:code",
                get(|Path(code): Path<u16>| async move {
                    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                }),
            )
            .route("/redirect/see-other", any(|| async { Redirect::to("/echo") }))
            .route(
                "/redirect/temporary",
                any(|| async { Redirect::temporary("/echo") }),
            )
            .route(
                "/redirect/loop",
                get(|| async { Redirect::to("/redirect/loop") }),
            ),
    )
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Json<Value> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "host": header("host"),
        "content_type": header("content-type"),
        "user_agent": header("user-agent"),
        "probe": header("x-probe"),
        "body": body,
    }))
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}

pub fn url(addr: SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{addr}{path}")).expect("fixture url")
}

/// Configuration pointed at local fixtures with short timeouts.
pub fn config(ports: impl IntoIterator<Item = u16>, ip_check_url: Url) -> TorConfig {
    TorConfig::default()
        .with_ports(ports)
        .with_probe_timeout(Duration::from_millis(500))
        .with_timeout(Duration::from_secs(5))
        .with_ip_check_url(ip_check_url)
}

/// Minimal no-auth SOCKS5 server.
///
/// Every CONNECT target is recorded as `host:port`. With a redirect set, all
/// tunnels go to that address instead, standing in for a Tor exit that sees
/// a different network.
pub struct FakeSocks {
    pub port: u16,
    targets: Arc<Mutex<Vec<String>>>,
}

impl FakeSocks {
    pub fn spawn() -> Self {
        Self::spawn_with(None)
    }

    pub fn redirecting_to(exit: SocketAddr) -> Self {
        Self::spawn_with(Some(exit))
    }

    fn spawn_with(redirect: Option<SocketAddr>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake socks");
        let port = listener.local_addr().expect("socks addr").port();
        let targets = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&targets);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let recorded = Arc::clone(&recorded);
                thread::spawn(move || {
                    let _ = serve_socks(stream, redirect, &recorded);
                });
            }
        });

        Self { port, targets }
    }

    /// CONNECT targets seen so far, in order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().expect("targets lock").clone()
    }
}

fn serve_socks(
    mut client: TcpStream,
    redirect: Option<SocketAddr>,
    targets: &Mutex<Vec<String>>,
) -> io::Result<()> {
    let mut greeting = [0u8; 2];
    client.read_exact(&mut greeting)?;
    let mut methods = vec![0u8; usize::from(greeting[1])];
    client.read_exact(&mut methods)?;
    client.write_all(&[0x05, 0x00])?;

    let mut head = [0u8; 4];
    client.read_exact(&mut head)?;
    let host = match head[3] {
        0x01 => {
            let mut addr = [0u8; 4];
            client.read_exact(&mut addr)?;
            Ipv4Addr::from(addr).to_string()
        }
        0x03 => {
            let mut len = [0u8; 1];
            client.read_exact(&mut len)?;
            let mut name = vec![0u8; usize::from(len[0])];
            client.read_exact(&mut name)?;
            String::from_utf8_lossy(&name).into_owned()
        }
        0x04 => {
            let mut addr = [0u8; 16];
            client.read_exact(&mut addr)?;
            Ipv6Addr::from(addr).to_string()
        }
        other => return Err(io::Error::other(format!("bad address type {other}"))),
    };
    let mut port = [0u8; 2];
    client.read_exact(&mut port)?;
    let port = u16::from_be_bytes(port);

    targets
        .lock()
        .expect("targets lock")
        .push(format!("{host}:{port}"));

    let upstream = match redirect {
        Some(addr) => TcpStream::connect(addr),
        None => TcpStream::connect((host.as_str(), port)),
    };
    let upstream = match upstream {
        Ok(upstream) => upstream,
        Err(e) => {
            client.write_all(&[0x05, 0x05, 0x00, 0x01, 0, 0, 0, 0, 0, 0])?;
            return Err(e);
        }
    };
    client.write_all(&[0x05, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0])?;

    relay(client, upstream)
}

fn relay(client: TcpStream, upstream: TcpStream) -> io::Result<()> {
    let mut client_read = client.try_clone()?;
    let mut upstream_write = upstream.try_clone()?;
    let outbound = thread::spawn(move || {
        let _ = io::copy(&mut client_read, &mut upstream_write);
        let _ = upstream_write.shutdown(Shutdown::Write);
    });

    let mut upstream_read = upstream;
    let mut client_write = client;
    let _ = io::copy(&mut upstream_read, &mut client_write);
    let _ = client_write.shutdown(Shutdown::Write);

    let _ = outbound.join();
    Ok(())
}
