//! Presentation projection.
//!
//! A [`View`] is a pure function of application state. Frontends render it
//! and never reach into the session layer directly.

use antenna_client::SendError;

use crate::{InputBuffer, Message, RoomId};

/// What the presentation surface shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    /// No room known: join form.
    JoinPrompt {
        /// Room name being typed.
        input: &'a InputBuffer,
    },
    /// Session construction in progress.
    Loading {
        /// Room being joined, if known.
        room: Option<&'a RoomId>,
    },
    /// Initialization failed.
    Error {
        /// Error message from the engine.
        message: &'a str,
    },
    /// Live chat.
    Chat {
        /// Current room.
        room: &'a RoomId,
        /// Log, oldest first.
        messages: &'a [Message],
        /// Draft being typed.
        draft: &'a InputBuffer,
        /// Most recent send rejection, until the next successful send.
        send_error: Option<&'a SendError>,
    },
}

impl View<'_> {
    /// Short label, for logs and status lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinPrompt { .. } => "join",
            Self::Loading { .. } => "loading",
            Self::Error { .. } => "error",
            Self::Chat { .. } => "chat",
        }
    }
}
