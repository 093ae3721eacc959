//! Handshake envelope.
//!
//! Before the chat stream starts the client announces itself with
//! [`SignalMessage::Join`] and waits for [`SignalMessage::Welcome`]. Messages
//! are adjacently tagged: `{"op": "Join", "d": {...}}`.
//!
//! ```text
//! client                         server
//!   │ ── Join{room, token} ──────> │
//!   │ <───────── Welcome{peer_id} ─ │   handshake complete
//!   │ <───────── Error{message} ─── │   handshake rejected
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    IceServer,
    errors::{ProtocolError, Result},
};

/// Room joined by the single-room deployment.
pub const DEFAULT_ROOM: &str = "DEFAULT";

/// Handshake message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    /// Client asks to join a room.
    Join {
        /// Room to join.
        room: String,
        /// Shared-secret access token.
        token: Option<String>,
        /// Assist endpoints (peer-assisted deployment only).
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ice_servers: Vec<IceServer>,
    },
    /// Server accepted the join.
    Welcome {
        /// Server-assigned peer identifier.
        peer_id: String,
    },
    /// Server rejected the join.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl SignalMessage {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "Join",
            Self::Welcome { .. } => "Welcome",
            Self::Error { .. } => "Error",
        }
    }

    /// Serialize to a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Parse a JSON text frame.
    pub fn decode(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}
