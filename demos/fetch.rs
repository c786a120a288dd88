//! # Fetching through Tor
//!
//! Runs the same fetches two ways: through the fail-fast wrapper, which only
//! runs once the exit address is verified, and with a client driven by hand.
//!
//! Needs a local Tor (Tor Browser on 9150 or the tor service on 9050).
//! `TORQ_PORTS`, `TORQ_TIMEOUT_SECS`, `TORQ_PROXY_HOST` and
//! `TORQ_IP_CHECK_URL` override the defaults. Set `RUST_LOG=debug` to see
//! probes and verification.

use serde_json::json;
use torq::{RequestOptions, Tor, TorClient, TorConfig, tor_request};

fn main() {
    env_logger::init();

    let config = match TorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    println!("🧅 Example 1: fail-fast wrapper");
    wrapped_fetch(&config);

    println!("\n🧅 Example 2: direct client usage");
    if let Err(e) = direct_usage(config) {
        eprintln!("Error: {e}");
    }
}

fn wrapped_fetch(config: &TorConfig) {
    let fetch_webpage = tor_request(|tor: &mut TorClient, url: &str| {
        tor.get(url, RequestOptions::new())
            .map(|response| response.text())
    })
    .with_config(config.clone());

    match fetch_webpage.call("https://example.com") {
        Ok(Ok(content)) => println!("{}", preview(&content)),
        Ok(Err(e)) => eprintln!("Request failed: {e}"),
        Err(e) => eprintln!("Tor not usable: {e}"),
    }
}

fn direct_usage(config: TorConfig) -> torq::Result<()> {
    let mut tor = Tor::with_config(config)?;

    if !tor.check_tor_connection()? {
        println!("Tor connection could not be verified, skipping requests");
        return Ok(());
    }
    println!(
        "Exit IP {} via {}",
        tor.exit_ip().unwrap_or("unknown"),
        tor.proxy_url().unwrap_or_default()
    );

    let response = tor.get("https://example.com", RequestOptions::new())?;
    println!("{}", preview(&response.text()));

    let response = tor.post(
        "https://example.com/api",
        RequestOptions::new().json(&json!({"key": "value"})),
    )?;
    println!("{}", response.status());

    Ok(())
}

/// First 100 characters of `text`.
fn preview(text: &str) -> &str {
    text.char_indices()
        .nth(100)
        .map_or(text, |(end, _)| &text[..end])
}
