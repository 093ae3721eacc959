//! Engine capability traits.
//!
//! The session layer consumes the chat engine through four operations:
//! construct, subscribe, send, release. Everything else (transport,
//! authentication, encoding, peer negotiation) stays behind [`Engine`].
//!
//! # Inbound delivery
//!
//! Inbound events are push notifications. Rather than storing a callback,
//! a session is handed an [`InboundSink`] at subscription time. The sink
//! forwards every message into a channel owned by the session layer, tagged
//! with the [`SessionGeneration`] of the session it was registered on. The
//! receiving side compares that tag against the session it currently owns,
//! so a released-but-still-firing engine can never reach the message log.

use std::{fmt, future::Future};

use antenna_proto::{InboundMessage, OutboundMessage, TransportOptions};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{EngineError, SendError};

/// Identity of one session within a runtime.
///
/// Monotonically assigned; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionGeneration(pub u64);

impl SessionGeneration {
    /// Following generation.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SessionGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inbound message tagged with the session that delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEnvelope {
    /// Session the message arrived on.
    pub generation: SessionGeneration,
    /// Message as delivered by the engine.
    pub message: InboundMessage,
}

/// The single inbound listener registered on a session.
#[derive(Debug, Clone)]
pub struct InboundSink {
    generation: SessionGeneration,
    tx: mpsc::UnboundedSender<InboundEnvelope>,
}

impl InboundSink {
    /// Create a sink for the given session.
    pub fn new(generation: SessionGeneration, tx: mpsc::UnboundedSender<InboundEnvelope>) -> Self {
        Self { generation, tx }
    }

    /// Session this sink is registered on.
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    /// Forward a message to the session layer.
    ///
    /// Returns `false` once the session layer has gone away. Engines should
    /// stop delivering at that point; it is not an error.
    pub fn deliver(&self, message: InboundMessage) -> bool {
        self.tx.send(InboundEnvelope { generation: self.generation, message }).is_ok()
    }

    /// Receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The optional third constructor argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTarget {
    /// Single global room; no room argument.
    Global,
    /// Named room.
    Room(String),
    /// Peer-assisted transport options (room plus assist endpoints).
    Transport(TransportOptions),
}

impl SessionTarget {
    /// Room named by this target, if any.
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Room(room) => Some(room),
            Self::Transport(options) => Some(&options.room),
        }
    }
}

/// Everything an engine needs to construct a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// Connection address, `{ws|wss}://{host}/ws/{visitor-id}[/{room}]`.
    pub address: String,
    /// Shared-secret access token.
    pub token: String,
    /// Per-session visitor identifier embedded in `address`.
    pub visitor_id: Uuid,
    /// Room or transport options.
    pub target: SessionTarget,
}

/// External chat engine.
///
/// Implementations are cheap handles (`Clone`); the session layer clones the
/// engine into each pending construction.
pub trait Engine: Clone + 'static {
    /// Live binding produced by [`Engine::construct`].
    type Session: Session + 'static;

    /// Open a session: connect, authenticate, join.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if construction or the handshake fails. A
    /// partially built resource must be released before returning.
    fn construct(
        &self,
        params: SessionParams,
    ) -> impl Future<Output = Result<Self::Session, EngineError>>;
}

/// One live binding between the session layer and the engine.
pub trait Session {
    /// Register the inbound listener.
    ///
    /// Called exactly once, before the session is declared ready. Messages
    /// the engine received before this call must be buffered and delivered
    /// in arrival order.
    fn subscribe(&mut self, sink: InboundSink);

    /// Hand a message to the engine.
    ///
    /// # Errors
    ///
    /// Returns a [`SendError`] if the engine cannot accept the message. The
    /// session remains usable.
    fn send(&self, message: &OutboundMessage) -> Result<(), SendError>;

    /// Release the underlying resource. Must tolerate repeated calls.
    fn release(&mut self);
}
