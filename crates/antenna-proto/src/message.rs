//! Chat message payloads.
//!
//! The outbound shape is a single `text` field; the engine stamps author and
//! time on the server side and echoes the result back as an
//! [`InboundMessage`]. Field names are part of the wire contract and must not
//! be renamed.

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Text authored locally and handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Message body, already trimmed by the dispatcher.
    pub text: String,
}

impl OutboundMessage {
    /// Wrap text in the outbound shape.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Serialize to a JSON text frame.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

/// Message delivered by the engine's inbound stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Visitor id of the author.
    pub author_id: String,
    /// Server timestamp, epoch milliseconds.
    pub timestamp: u64,
    /// Message body.
    pub text: String,
}

impl InboundMessage {
    /// Parse a JSON text frame.
    pub fn from_json(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Relay / negotiation-assist endpoint.
///
/// Only used by the peer-assisted deployment. `username` and `credential`
/// are omitted from the wire when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    /// Endpoint URLs (`stun:` / `turn:` schemes).
    pub urls: Vec<String>,
    /// Relay username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Relay credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServer {
    /// Anonymous endpoint with the given URLs.
    pub fn new<I, U>(urls: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self { urls: urls.into_iter().map(Into::into).collect(), username: None, credential: None }
    }

    /// Attach relay credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.credential = Some(credential.into());
        self
    }
}

/// Constructor options for the peer-assisted deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Room the session is scoped to.
    pub room: String,
    /// Assist endpoints offered to the engine.
    #[serde(default)]
    pub ice_servers: Vec<IceServer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_wire_shape_is_text_only() {
        let json = OutboundMessage::new("Hello").to_json().unwrap();
        assert_eq!(json, r#"{"text":"Hello"}"#);
    }

    #[test]
    fn inbound_parses_engine_shape() {
        let msg =
            InboundMessage::from_json(r#"{"author_id":"a1","timestamp":1700000000000,"text":"hi"}"#)
                .unwrap();

        assert_eq!(msg.author_id, "a1");
        assert_eq!(msg.timestamp, 1_700_000_000_000);
        assert_eq!(msg.text, "hi");
    }

    #[test]
    fn inbound_missing_field_is_decode_error() {
        let err = InboundMessage::from_json(r#"{"author_id":"a1","text":"hi"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }

    #[test]
    fn ice_server_omits_absent_credentials() {
        let json = serde_json::to_string(&IceServer::new(["stun:stun.example.org"])).unwrap();
        assert_eq!(json, r#"{"urls":["stun:stun.example.org"]}"#);

        let with_creds = IceServer::new(["turn:relay.example.org"]).with_credentials("u", "p");
        let json = serde_json::to_string(&with_creds).unwrap();
        assert!(json.contains(r#""username":"u""#));
        assert!(json.contains(r#""credential":"p""#));
    }
}
