/*
[INPUT]:  Error sources (endpoint parsing, runtime, transport, JSON encode/decode)
[OUTPUT]: Structured error type shared by the socket layer
[POS]:    Error handling layer - unified error type for the crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Main error type for tickwire sockets
#[derive(Error, Debug)]
pub enum SocketError {
    /// Endpoint is a valid URL but not a WebSocket one
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Called outside a tokio runtime
    #[error("No tokio runtime available to drive the connection")]
    NoRuntime,

    /// WebSocket handshake failed
    #[error("Connection failed: {0}")]
    Connect(#[source] tungstenite::Error),

    /// WebSocket error after the connection was open
    #[error("WebSocket error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// Outbound payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Inbound frame was not valid JSON
    #[error("Failed to decode message: {source}")]
    Decode { source: serde_json::Error },

    /// Inbound binary frame was not UTF-8
    #[error("Binary frame of {bytes} bytes is not valid UTF-8")]
    NonUtf8Frame { bytes: usize },

    /// Inbound JSON had no top-level `data` field
    #[error("Message has no `data` field")]
    MissingData,

    /// Connection is not open
    #[error("WebSocket not connected")]
    NotConnected,
}

impl SocketError {
    /// Check if the error concerns a single inbound frame (the connection stays up)
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            SocketError::Decode { .. } | SocketError::NonUtf8Frame { .. } | SocketError::MissingData
        )
    }

    /// Check if the error ended (or prevented) the connection
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            SocketError::Connect(_) | SocketError::Transport(_) | SocketError::NotConnected
        )
    }

    pub(crate) fn decode(source: serde_json::Error) -> Self {
        SocketError::Decode { source }
    }
}

/// Result type alias for tickwire operations
pub type Result<T> = std::result::Result<T, SocketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_decode_error() {
        assert!(SocketError::MissingData.is_decode_error());
        assert!(SocketError::NonUtf8Frame { bytes: 4 }.is_decode_error());
        assert!(!SocketError::NotConnected.is_decode_error());
    }

    #[test]
    fn test_error_is_connection_error() {
        let err = SocketError::Connect(tungstenite::Error::ConnectionClosed);
        assert!(err.is_connection_error());
        assert!(SocketError::NotConnected.is_connection_error());
        assert!(!SocketError::MissingData.is_connection_error());
    }

    #[test]
    fn test_decode_error_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SocketError::decode(source);
        assert!(err.is_decode_error());
        assert!(err.to_string().starts_with("Failed to decode message"));
    }
}
