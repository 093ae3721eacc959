//! Protocol errors.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding wire messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Payload is not valid JSON for the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Server sent a frame that is not valid at this point of the handshake.
    #[error("unexpected message: expected {expected}, got {got}")]
    Unexpected {
        /// Message kind we were waiting for
        expected: &'static str,
        /// Message kind we received
        got: &'static str,
    },
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
