/*
[INPUT]:  WebSocket URL (first CLI argument)
[OUTPUT]: Inbound `data` payloads printed to stdout
[POS]:    Examples - message socket usage
[UPDATE]: When WebSocket API changes
*/

use tickwire_adapter::*;
use tokio::time::{sleep, Duration};

/// Example: connect, send a subscription on open, print every `data` payload
///
/// Run against any server that wraps its payloads as `{"data": ...}`:
/// `cargo run --example websocket_example -- ws://127.0.0.1:9000`
#[tokio::main]
async fn main() {
    println!("=== tickwire WebSocket Example ===\n");

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://127.0.0.1:9000".to_string());

    let config = ConnectionConfig::new(|data| println!("✓ data: {data}"))
        .with_request_value(serde_json::json!({
            "subscribe": { "channel": "price", "symbol": "BTC-USD" }
        }))
        .on_open(|| println!("✓ connection open"))
        .on_error(|err| println!("✗ error: {err}"))
        .on_close(|| println!("✓ connection closed"));

    let handle = match create_connection(&endpoint, config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to create connection: {}", e);
            return;
        }
    };
    println!("✓ connecting to {}", handle.endpoint());

    println!("\nListening for 10 seconds...");
    tokio::select! {
        _ = sleep(Duration::from_secs(10)) => handle.close(),
        _ = handle.closed() => {}
    }
    handle.closed().await;

    println!("\n✓ WebSocket example complete");
}
