//! Error types for the engine boundary.
//!
//! Two failure classes cross the boundary and they never mix:
//! [`EngineError`] ends a session before it becomes usable, [`SendError`]
//! affects a single outbound message on a session that stays usable.

use antenna_proto::ProtocolError;
use thiserror::Error;

/// Session construction or handshake failed.
///
/// Terminal for the session that produced it; the session layer does not
/// retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Connection address could not be built from the configuration.
    #[error("invalid connection address: {0}")]
    InvalidAddress(String),

    /// Transport could not be opened.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Handshake rejected or timed out. Displays the engine's own text.
    #[error("{0}")]
    Handshake(String),

    /// Server spoke something other than the handshake protocol.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Transport closed before the handshake completed.
    #[error("connection closed during handshake")]
    Closed,
}

/// A single outbound send failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Transport is not open (not yet, or no longer).
    #[error("transport not open")]
    NotOpen,

    /// Engine refused the message.
    #[error("send rejected: {0}")]
    Rejected(String),

    /// Message could not be encoded.
    #[error("encode failed: {0}")]
    Encode(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_error_displays_engine_text_verbatim() {
        let err = EngineError::Handshake("handshake timeout".into());
        assert_eq!(err.to_string(), "handshake timeout");
    }

    #[test]
    fn protocol_errors_convert() {
        let err: EngineError = ProtocolError::Decode("bad".into()).into();
        assert!(matches!(err, EngineError::Protocol(_)));
    }
}
