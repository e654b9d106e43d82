/*
[INPUT]:  WebSocket endpoint and ConnectionConfig
[OUTPUT]: ConnectionHandle; hooks invoked from a spawned connection task
[POS]:    WebSocket layer - connection lifecycle and frame dispatch
[UPDATE]: When changing connect, send, receive, or close handling
*/

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use url::Url;

use super::config::{ConnectionConfig, Hooks};
use super::handle::{Command, ConnectionHandle, ConnectionState};
use super::message::extract_data;
use crate::error::{Result, SocketError};

const MESSAGE_SAMPLE_LIMIT: usize = 3;
const DECODE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

/// Open a connection to `endpoint` and return its handle immediately.
///
/// The connection attempt starts right away on a task spawned onto the
/// current tokio runtime. Once open, `on_open` runs and the configured
/// request (if any) is sent as the first frame. Every inbound frame is
/// parsed as JSON and its `data` field handed to `on_message`; frames that
/// fail to decode go to `on_error` and the connection stays up. There is no
/// reconnection: after a handshake or transport failure `on_error` and then
/// `on_close` run and the handle reports `ConnectionState::Closed`.
///
/// Only `ConnectionHandle::close` (or the peer) ends the connection; once
/// every handle is dropped it keeps delivering messages until the transport
/// closes.
///
/// # Errors
/// `SocketError::UrlParse` / `SocketError::InvalidEndpoint` when `endpoint`
/// is not a `ws://` or `wss://` URL, and `SocketError::NoRuntime` when called
/// outside a tokio runtime.
pub fn create_connection(endpoint: &str, config: ConnectionConfig) -> Result<ConnectionHandle> {
    let url = parse_endpoint(endpoint)?;
    let runtime = Handle::try_current().map_err(|_| SocketError::NoRuntime)?;

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
    let (request, hooks) = config.into_parts();
    let has_request = request.is_some();

    runtime.spawn(run_connection(
        url.to_string(),
        request,
        hooks,
        command_rx,
        state_tx,
    ));
    debug!(endpoint, has_request, "ws connection requested");

    Ok(ConnectionHandle::new(endpoint, command_tx, state_rx))
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(SocketError::InvalidEndpoint(format!(
            "unsupported scheme `{other}` in {endpoint}"
        ))),
    }
}

async fn run_connection(
    endpoint: String,
    request: Option<Value>,
    mut hooks: Hooks,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ConnectionState>,
) {
    // Cleared once every handle is dropped; the connection keeps reading.
    let mut accepting_commands = true;

    let connect = connect_async(endpoint.as_str());
    tokio::pin!(connect);
    let stream = loop {
        tokio::select! {
            connected = &mut connect => match connected {
                Ok((stream, _response)) => break stream,
                Err(err) => {
                    warn!(endpoint = %endpoint, error = %err, "ws connect failed");
                    hooks.error(SocketError::Connect(err));
                    finish(&endpoint, &state, &mut hooks);
                    return;
                }
            },
            command = commands.recv(), if accepting_commands => match command {
                Some(Command::Close) => {
                    debug!(endpoint = %endpoint, "ws connect aborted");
                    finish(&endpoint, &state, &mut hooks);
                    return;
                }
                // Rejected by the handle until open
                Some(Command::Send(_)) => {}
                None => accepting_commands = false,
            },
        }
    };

    let (mut write, mut read) = stream.split();
    let mut frame_log = FrameLog::default();
    state.send_replace(ConnectionState::Open);
    info!(endpoint = %endpoint, "ws connection open");
    hooks.open();

    if let Some(request) = request {
        let text = request.to_string();
        match write.send(WsMessage::Text(text.clone().into())).await {
            Ok(()) => {
                let preview = truncate_for_log(&text, RAW_LOG_MAX_BYTES);
                info!(endpoint = %endpoint, request = %preview, "ws request sent");
            }
            Err(err) => {
                warn!(endpoint = %endpoint, error = %err, "ws request send failed");
                hooks.error(SocketError::Transport(err));
            }
        }
    }

    loop {
        tokio::select! {
            command = commands.recv(), if accepting_commands => {
                match command {
                    Some(Command::Send(text)) => {
                        if let Err(err) = write.send(WsMessage::Text(text.into())).await {
                            warn!(endpoint = %endpoint, error = %err, "ws send failed");
                            hooks.error(SocketError::Transport(err));
                            break;
                        }
                    }
                    Some(Command::Close) => {
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                    None => {
                        debug!(endpoint = %endpoint, "ws handles dropped; reading until transport ends");
                        accepting_commands = false;
                    }
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Close(frame))) => {
                        debug!(endpoint = %endpoint, frame = ?frame, "ws close received");
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                    Some(Ok(message)) => dispatch_frame(message, &mut hooks, &mut frame_log),
                    Some(Err(err)) => {
                        warn!(endpoint = %endpoint, error = %err, "ws transport error");
                        hooks.error(SocketError::Transport(err));
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    finish(&endpoint, &state, &mut hooks);
}

fn finish(endpoint: &str, state: &watch::Sender<ConnectionState>, hooks: &mut Hooks) {
    state.send_replace(ConnectionState::Closed);
    info!(endpoint, "ws connection closed");
    hooks.close();
}

fn dispatch_frame(message: WsMessage, hooks: &mut Hooks, frame_log: &mut FrameLog) {
    let decoded = match &message {
        WsMessage::Text(text) => decode_text(text.as_str(), frame_log),
        WsMessage::Binary(bytes) => match std::str::from_utf8(&bytes[..]) {
            Ok(text) => decode_text(text, frame_log),
            Err(_) => Err(SocketError::NonUtf8Frame { bytes: bytes.len() }),
        },
        _ => return,
    };

    match decoded {
        Ok(data) => hooks.message(data),
        Err(err) => hooks.error(err),
    }
}

fn decode_text(text: &str, frame_log: &mut FrameLog) -> Result<Value> {
    match extract_data(text) {
        Ok(data) => {
            frame_log.message_sample(text);
            Ok(data)
        }
        Err(err) => {
            frame_log.decode_failed(&err, text);
            Err(err)
        }
    }
}

/// Sampled frame logging, counted per connection
#[derive(Debug, Default)]
struct FrameLog {
    samples: usize,
    decode_failures: usize,
}

impl FrameLog {
    /// Returns whether the frame was logged
    fn message_sample(&mut self, raw: &str) -> bool {
        let count = self.samples;
        self.samples += 1;
        if count >= MESSAGE_SAMPLE_LIMIT {
            return false;
        }

        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = MESSAGE_SAMPLE_LIMIT,
            bytes = raw.len(),
            message = %preview,
            "ws message sample"
        );
        true
    }

    /// Returns whether the failure was logged
    fn decode_failed(&mut self, err: &SocketError, raw: &str) -> bool {
        let count = self.decode_failures;
        self.decode_failures += 1;
        if count >= DECODE_FAIL_LOG_LIMIT {
            return false;
        }

        warn!(
            sample_index = count + 1,
            sample_limit = DECODE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "ws message decode failed"
        );
        let preview = truncate_for_log(raw, RAW_LOG_MAX_BYTES);
        debug!(
            sample_index = count + 1,
            sample_limit = DECODE_FAIL_LOG_LIMIT,
            message = %preview,
            "ws message decode failed"
        );
        true
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
