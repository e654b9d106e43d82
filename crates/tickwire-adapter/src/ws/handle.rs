/*
[INPUT]:  Caller commands (send, close) and state updates from the connection task
[OUTPUT]: Cloneable handle to a live connection
[POS]:    WebSocket layer - caller-facing connection handle
[UPDATE]: When adding handle operations or connection states
*/

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::error::{Result, SocketError};

/// Lifecycle of a single connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug)]
pub(crate) enum Command {
    Send(String),
    Close,
}

/// Handle to a connection created by `create_connection`.
///
/// Clones share the connection. Dropping every clone only gives up the
/// ability to send and close; inbound messages keep reaching `on_message`
/// until the peer or the transport ends the connection.
#[must_use = "the connection stays open until `close` is called; keep the handle to send or close it"]
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    endpoint: Arc<str>,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
}

impl ConnectionHandle {
    pub(crate) fn new(
        endpoint: &str,
        commands: mpsc::UnboundedSender<Command>,
        state: watch::Receiver<ConnectionState>,
    ) -> Self {
        Self {
            endpoint: Arc::from(endpoint),
            commands,
            state,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Send `message` as a JSON text frame (fire-and-forget).
    ///
    /// # Errors
    /// `SocketError::NotConnected` unless the connection is open, or
    /// `SocketError::Serialization` if `message` is not representable as JSON.
    pub fn send<T>(&self, message: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        if !self.is_open() {
            return Err(SocketError::NotConnected);
        }
        let text = serde_json::to_string(message)?;
        self.commands
            .send(Command::Send(text))
            .map_err(|_| SocketError::NotConnected)
    }

    /// Ask the connection task to close. Idempotent.
    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }

    /// Wait until the connection has closed.
    pub async fn closed(&self) {
        let mut state = self.state.clone();
        let _ = state
            .wait_for(|state| *state == ConnectionState::Closed)
            .await;
    }
}
