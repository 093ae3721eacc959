//! Observable application state types.
//!
//! [`ConnectionState`] and [`Message`] are the "view model" of the session
//! layer: enough to render the interface without exposing engine handles.

use antenna_proto::InboundMessage;

/// Connection state of the session.
///
/// Transitions are strictly monotonic:
///
/// ```text
/// Uninitialized → Initializing → Ready
///                              → Failed
/// ```
///
/// `Ready` and `Failed` are terminal for a mount. Releasing the session does
/// not change this value; release is tracked by the
/// [`crate::SessionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No room known yet; nothing attempted.
    Uninitialized,
    /// Engine construction in progress.
    Initializing,
    /// Session live and subscribed.
    Ready,
    /// Construction or handshake failed. No retry.
    Failed,
}

impl ConnectionState {
    /// Whether `next` is the declared successor of this state.
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Initializing)
                | (Self::Initializing, Self::Ready | Self::Failed)
        )
    }

    /// `Ready` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// A message in the log.
///
/// Produced only from the engine's inbound stream and never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Visitor id of the author.
    pub author_id: String,
    /// Server timestamp, epoch milliseconds.
    pub timestamp: u64,
    /// Message body.
    pub text: String,
}

impl From<InboundMessage> for Message {
    fn from(inbound: InboundMessage) -> Self {
        Self { author_id: inbound.author_id, timestamp: inbound.timestamp, text: inbound.text }
    }
}
