//! Application layer for Antenna
//!
//! The client-side session layer of the chat interface: pure state machines
//! for room selection, session lifecycle, the inbound message stream and
//! outbound sends, plus a generic runtime that drives them against an
//! external [`antenna_client::Engine`].
//!
//! # Components
//!
//! - [`RoomResolver`]: room id from the persisted location or the join form
//! - [`SessionManager`]: exactly one session per mount, released exactly once
//! - [`MessageStream`]: append-only, arrival-ordered [`MessageLog`]
//! - [`Dispatcher`]: validates and forwards the draft
//! - [`View`]: pure projection for the presentation surface
//! - [`App`]: ties the above together; events in, actions out
//! - [`Driver`]: trait for platform-specific frontend I/O
//! - [`Runtime`]: generic cooperative loop using Driver and Engine
//!
//! # Session state machine
//!
//! ```text
//! Uninitialized --(room known)--> Initializing --(engine ready)--> Ready
//!                                         \--(engine error)------> Failed
//! Ready/Failed --(teardown)--> Released (terminal, idempotent)
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod dispatch;
mod driver;
mod event;
mod input;
mod lifecycle;
mod room;
mod runtime;
mod state;
mod stream;
mod view;

pub use action::AppAction;
pub use app::App;
pub use config::{ChatConfig, DEFAULT_ACCESS_TOKEN, DEFAULT_HOST, Deployment, RoomPlacement};
pub use dispatch::{DispatchOutcome, Dispatcher, Validation};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputBuffer, KeyInput};
pub use lifecycle::{Completion, InitTicket, SessionManager};
pub use room::{Location, ROOM_PARAM, RoomError, RoomId, RoomResolver, UrlLocation};
pub use runtime::Runtime;
pub use state::{ConnectionState, Message};
pub use stream::{Delivery, MessageLog, MessageStream};
pub use view::View;
