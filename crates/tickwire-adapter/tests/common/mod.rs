/*
[INPUT]:  Test scenarios needing a WebSocket peer
[OUTPUT]: In-process WebSocket server and hook-capture helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for tickwire-adapter tests

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub const WAIT: Duration = Duration::from_secs(5);

/// Single-connection WebSocket server.
///
/// Every frame the client sends (including its close frame) is forwarded to
/// `next_frame`; frames passed to `push` are written to the client once the
/// handshake completes.
pub struct MockServer {
    url: String,
    inbound: mpsc::UnboundedReceiver<Message>,
    outbound: mpsc::UnboundedSender<Message>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("listener address");
        let (inbound_tx, inbound) = mpsc::unbounded_channel();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(ws) = accept_async(stream).await else {
                return;
            };
            let (mut write, mut read) = ws.split();

            loop {
                tokio::select! {
                    outgoing = outbound_rx.recv() => {
                        match outgoing {
                            Some(message) => {
                                if write.send(message).await.is_err() {
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                    incoming = read.next() => {
                        match incoming {
                            Some(Ok(message)) => {
                                let closing = message.is_close();
                                let _ = inbound_tx.send(message);
                                if closing {
                                    break;
                                }
                            }
                            _ => break,
                        }
                    }
                }
            }
        });

        Self {
            url: format!("ws://{addr}"),
            inbound,
            outbound,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn push(&self, message: Message) {
        self.outbound.send(message).expect("server task alive");
    }

    pub fn push_text(&self, text: &str) {
        self.push(Message::text(text));
    }

    /// Next frame received from the client, or `None` after `WAIT`
    pub async fn next_frame(&mut self) -> Option<Message> {
        timeout(WAIT, self.inbound.recv()).await.ok().flatten()
    }
}

/// Endpoint that refuses connections
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("ws://{addr}")
}

/// Receive from a hook channel, failing the test after `WAIT`
pub async fn recv<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for hook")
        .expect("hook channel closed")
}

/// Assert that nothing arrives on a hook channel for a short while
pub async fn assert_quiet<T: std::fmt::Debug>(rx: &mut mpsc::UnboundedReceiver<T>) {
    if let Ok(Some(value)) = timeout(Duration::from_millis(200), rx.recv()).await {
        panic!("unexpected hook call: {value:?}");
    }
}
