//! Local IP-echo services and a fake SOCKS5 proxy that tunnels every CONNECT
//! to a fixed "exit" address.

#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use torq::{TorConfig, Url};

pub fn ip_echo(ip: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind echo");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().expect("echo addr");
    let app = Router::new().route("/ip", get(move || async move { Json(json!({ "ip": ip })) }));

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("echo runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve echo");
        });
    });

    addr
}

pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}

pub fn config(port: u16, direct: SocketAddr) -> TorConfig {
    let ip_check_url = Url::parse(&format!("http://{direct}/ip")).expect("echo url");
    TorConfig::default()
        .with_ports([port])
        .with_probe_timeout(Duration::from_millis(500))
        .with_timeout(Duration::from_secs(5))
        .with_ip_check_url(ip_check_url)
}

/// Start a no-auth SOCKS5 proxy that sends every tunnel to `exit` and return
/// its port.
pub fn socks_to(exit: SocketAddr) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind socks");
    let port = listener.local_addr().expect("socks addr").port();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            thread::spawn(move || {
                let _ = tunnel(stream, exit);
            });
        }
    });

    port
}

fn tunnel(mut client: TcpStream, exit: SocketAddr) -> io::Result<()> {
    let mut greeting = [0u8; 2];
    client.read_exact(&mut greeting)?;
    let mut methods = vec![0u8; usize::from(greeting[1])];
    client.read_exact(&mut methods)?;
    client.write_all(&[0x05, 0x00])?;

    let mut head = [0u8; 4];
    client.read_exact(&mut head)?;
    let skip = match head[3] {
        0x01 => 4,
        0x04 => 16,
        0x03 => {
            let mut len = [0u8; 1];
            client.read_exact(&mut len)?;
            usize::from(len[0])
        }
        other => return Err(io::Error::other(format!("bad address type {other}"))),
    };
    // Address and port are ignored; everything goes to the exit.
    let mut rest = vec![0u8; skip + 2];
    client.read_exact(&mut rest)?;

    let upstream = TcpStream::connect(exit)?;
    client.write_all(&[0x05, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0])?;

    let mut client_read = client.try_clone()?;
    let mut upstream_write = upstream.try_clone()?;
    let outbound = thread::spawn(move || {
        let _ = io::copy(&mut client_read, &mut upstream_write);
        let _ = upstream_write.shutdown(Shutdown::Write);
    });

    let mut upstream_read = upstream;
    let _ = io::copy(&mut upstream_read, &mut client);
    let _ = client.shutdown(Shutdown::Write);
    let _ = outbound.join();
    Ok(())
}
