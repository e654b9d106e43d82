/*
[INPUT]:  WebSocket endpoint, optional initial request, lifecycle hooks
[OUTPUT]: Live connection handle; inbound `data` payloads delivered to hooks
[POS]:    WebSocket layer - JSON message socket
[UPDATE]: When changing connection lifecycle or hook semantics
*/

pub mod client;
pub mod config;
pub mod handle;
pub mod message;

pub use client::create_connection;
pub use config::ConnectionConfig;
pub use handle::{ConnectionHandle, ConnectionState};
pub use message::extract_data;
