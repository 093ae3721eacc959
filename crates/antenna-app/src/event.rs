//! Application events.
//!
//! This module defines the [`AppEvent`] enum, which represents all inputs
//! that can drive the [`crate::App`] state machine.

use antenna_client::InboundEnvelope;

use crate::KeyInput;

/// Events that drive the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Surface resized; redraw.
    Resize(u16, u16),

    /// Join form submitted with the given text.
    SubmitRoom(String),

    /// Replace the draft.
    SetDraft(String),

    /// Send the draft.
    Send,

    /// Persisted location observed, with its current room parameter.
    LocationChanged(Option<String>),

    /// Inbound message from a session.
    MessageReceived(InboundEnvelope),

    /// Presentation surface closed.
    Close,
}
