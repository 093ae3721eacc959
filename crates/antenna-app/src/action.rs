//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use crate::{InitTicket, RoomId};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the current view.
    Render,

    /// Quit the application.
    Quit,

    /// Write the room id to the persisted location.
    PersistRoom(RoomId),

    /// Construct the session for `room`. The result must be handed back via
    /// [`crate::App::complete_initialization`] with the same ticket.
    Construct {
        /// Latch ticket for this construction.
        ticket: InitTicket,
        /// Room to join.
        room: RoomId,
    },

    /// The persisted room changed: discard this mount and start a new one.
    Remount,
}
