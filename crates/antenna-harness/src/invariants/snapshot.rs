//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of one mount at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use antenna_app::{App, ConnectionState, Message};
use antenna_client::InboundMessage;

use crate::{SimEngine, SimSession};

/// Snapshot of one mount and the engine behind it.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Connection state.
    pub state: ConnectionState,
    /// Whether teardown has run.
    pub released: bool,
    /// Resolved room.
    pub room: Option<String>,
    /// Initialization error.
    pub init_error: Option<String>,
    /// Constructions started by this mount.
    pub constructs: usize,
    /// Release calls per engine session (all mounts).
    pub release_counts: Vec<u32>,
    /// Subscribe calls per engine session (all mounts).
    pub subscribe_counts: Vec<u32>,
    /// Subscribe calls on this mount's installed session.
    pub live_subscribes: Option<u32>,
    /// The app's message log.
    pub log: Vec<Message>,
    /// Messages the engine delivered through this mount's session before it
    /// was released.
    pub delivered: Vec<InboundMessage>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: ConnectionState::Uninitialized,
            released: false,
            room: None,
            init_error: None,
            constructs: 0,
            release_counts: Vec::new(),
            subscribe_counts: Vec::new(),
            live_subscribes: None,
            log: Vec::new(),
            delivered: Vec::new(),
        }
    }
}

impl SessionSnapshot {
    /// Capture `app` together with the engine records of `live_session`,
    /// the session installed by this mount.
    pub fn capture(
        app: &App<SimSession>,
        engine: &SimEngine,
        live_session: Option<usize>,
        constructs: usize,
    ) -> Self {
        let subscribe_counts = engine.subscribe_counts();
        Self {
            state: app.connection_state(),
            released: app.session().is_released(),
            room: app.room().map(ToString::to_string),
            init_error: app.init_error().map(ToString::to_string),
            constructs,
            release_counts: engine.release_counts(),
            live_subscribes: live_session.and_then(|i| subscribe_counts.get(i).copied()),
            subscribe_counts,
            log: app.messages().to_vec(),
            delivered: live_session.map(|i| engine.delivered_live(i)).unwrap_or_default(),
        }
    }
}
