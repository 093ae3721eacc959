//! Deployment configuration.
//!
//! The three deployment variants differ only in how a room id becomes
//! [`SessionParams`]; everything downstream of the engine is shared.

use antenna_client::{
    EngineError, IceServer, SessionParams, SessionTarget, TransportOptions, connection_address,
};
use uuid::Uuid;

use crate::RoomId;

/// Pre-shared access token presented when none is configured.
pub const DEFAULT_ACCESS_TOKEN: &str = "antenna-shared-secret";

/// Host used when the location carries none.
pub const DEFAULT_HOST: &str = "localhost:3000";

/// Where the multi-room variant carries the room id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPlacement {
    /// Appended to the connection address as a path segment.
    Path,
    /// Passed as the engine's room argument.
    Argument,
}

/// Deployment variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    /// Single implicit room; no join form.
    Global,
    /// Room chosen by the visitor.
    MultiRoom {
        /// How the room reaches the engine.
        placement: RoomPlacement,
    },
    /// Room chosen by the visitor, with connectivity-assist endpoints for
    /// the transport.
    PeerAssisted {
        /// STUN/TURN endpoints.
        ice_servers: Vec<IceServer>,
    },
}

impl Deployment {
    /// Whether the visitor picks a room.
    pub fn resolves_rooms(&self) -> bool {
        !matches!(self, Self::Global)
    }
}

/// Client configuration for one hosting location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// `host[:port]` of the chat backend.
    pub host: String,
    /// Use `wss` instead of `ws`.
    pub secure: bool,
    /// Pre-shared access token.
    pub token: String,
    /// Deployment variant.
    pub deployment: Deployment,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            secure: false,
            token: DEFAULT_ACCESS_TOKEN.to_string(),
            deployment: Deployment::MultiRoom { placement: RoomPlacement::Argument },
        }
    }
}

impl ChatConfig {
    /// Build construction parameters for `room` and a fresh visitor id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAddress`] if the host is not a valid
    /// authority.
    pub fn session_params(
        &self,
        room: &RoomId,
        visitor_id: Uuid,
    ) -> Result<SessionParams, EngineError> {
        let (path_room, target) = match &self.deployment {
            Deployment::Global => (None, SessionTarget::Global),
            Deployment::MultiRoom { placement: RoomPlacement::Path } => {
                (Some(room.as_str()), SessionTarget::Room(room.to_string()))
            },
            Deployment::MultiRoom { placement: RoomPlacement::Argument } => {
                (None, SessionTarget::Room(room.to_string()))
            },
            Deployment::PeerAssisted { ice_servers } => (
                None,
                SessionTarget::Transport(TransportOptions {
                    room: room.to_string(),
                    ice_servers: ice_servers.clone(),
                }),
            ),
        };

        let address = connection_address(&self.host, self.secure, visitor_id, path_room)?;
        Ok(SessionParams { address, token: self.token.clone(), visitor_id, target })
    }
}
