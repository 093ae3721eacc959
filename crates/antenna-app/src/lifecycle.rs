//! Session lifecycle.
//!
//! [`SessionManager`] owns the single session of a mount. It guarantees:
//!
//! - construction is attempted at most once, even if the room is observed
//!   repeatedly, because the latch is set *before* any asynchronous work
//! - the session is subscribed before it is published as `Ready`
//! - the session is released exactly once, and a construction that finishes
//!   after teardown is released immediately instead of installed
//!
//! The manager is synchronous. Construction itself is driven by the runtime,
//! which hands the result back through [`SessionManager::complete`] together
//! with the [`InitTicket`] issued by [`SessionManager::begin`].

use antenna_client::{EngineError, InboundEnvelope, InboundSink, Session, SessionGeneration};
use tokio::sync::mpsc;

use crate::ConnectionState;

/// Proof that a construction was started for a specific session generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitTicket {
    generation: SessionGeneration,
}

impl InitTicket {
    /// Generation the construction belongs to.
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }
}

/// What [`SessionManager::complete`] did with a construction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Session subscribed and installed.
    Ready,
    /// Construction failed; the error message was recorded.
    Failed,
    /// Result belonged to a released or superseded mount. A successful
    /// session was released on the spot.
    Discarded,
}

/// Owner of one mount's session.
pub struct SessionManager<S: Session> {
    generation: SessionGeneration,
    state: ConnectionState,
    attempted: bool,
    released: bool,
    session: Option<S>,
    failure: Option<String>,
    inbound: mpsc::UnboundedSender<InboundEnvelope>,
}

impl<S: Session> SessionManager<S> {
    /// Create a manager. Inbound messages of the session are forwarded to
    /// `inbound`, tagged with `generation`.
    pub fn new(
        generation: SessionGeneration,
        inbound: mpsc::UnboundedSender<InboundEnvelope>,
    ) -> Self {
        Self {
            generation,
            state: ConnectionState::Uninitialized,
            attempted: false,
            released: false,
            session: None,
            failure: None,
            inbound,
        }
    }

    /// Claim the initialization latch.
    ///
    /// Returns a ticket the first time it is called on a live manager, and
    /// `None` on every later call or after teardown.
    pub fn begin(&mut self) -> Option<InitTicket> {
        if self.released {
            tracing::debug!(generation = %self.generation, "not initializing released session");
            return None;
        }
        if std::mem::replace(&mut self.attempted, true) {
            tracing::debug!(generation = %self.generation, "initialization already attempted");
            return None;
        }

        self.advance(ConnectionState::Initializing);
        Some(InitTicket { generation: self.generation })
    }

    /// Hand back the result of the construction started by `ticket`.
    pub fn complete(&mut self, ticket: InitTicket, result: Result<S, EngineError>) -> Completion {
        let current = !self.released
            && ticket.generation == self.generation
            && self.state == ConnectionState::Initializing;

        if !current {
            tracing::debug!(
                generation = %self.generation,
                ticket = %ticket.generation,
                released = self.released,
                "discarding stale construction result"
            );
            if let Ok(mut late) = result {
                late.release();
            }
            return Completion::Discarded;
        }

        match result {
            Ok(mut session) => {
                session.subscribe(InboundSink::new(self.generation, self.inbound.clone()));
                self.session = Some(session);
                self.advance(ConnectionState::Ready);
                tracing::info!(generation = %self.generation, "session ready");
                Completion::Ready
            },
            Err(err) => {
                tracing::warn!(generation = %self.generation, error = %err, "session failed");
                self.failure = Some(err.to_string());
                self.advance(ConnectionState::Failed);
                Completion::Failed
            },
        }
    }

    /// Release the session.
    ///
    /// Idempotent. Returns `true` only on the call that actually released a
    /// live session.
    pub fn teardown(&mut self) -> bool {
        if std::mem::replace(&mut self.released, true) {
            return false;
        }

        match self.session.take() {
            Some(mut session) => {
                session.release();
                tracing::info!(generation = %self.generation, "session released");
                true
            },
            None => false,
        }
    }

    /// Whether an inbound message tagged `generation` should be accepted.
    pub fn is_live(&self, generation: SessionGeneration) -> bool {
        !self.released && self.state == ConnectionState::Ready && generation == self.generation
    }

    /// The session, while `Ready` and not released.
    pub fn active(&self) -> Option<&S> {
        if self.released || self.state != ConnectionState::Ready {
            return None;
        }
        self.session.as_ref()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Initialization error message, once `Failed`.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Generation of this mount.
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    /// Whether teardown has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Whether the initialization latch has been claimed.
    pub fn has_attempted(&self) -> bool {
        self.attempted
    }

    fn advance(&mut self, next: ConnectionState) {
        if self.state.can_advance_to(next) {
            self.state = next;
        } else {
            tracing::error!(from = ?self.state, to = ?next, "refusing non-monotonic transition");
        }
    }
}

impl<S: Session> Drop for SessionManager<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
