//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use antenna_app::{ConnectionState, Message};

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// At most one construction per mount.
///
/// The latch is claimed before construction starts, so re-observing the
/// room, even while a construction is pending, never starts a second one.
pub struct InitializationLatch;

impl Invariant for InitializationLatch {
    fn name(&self) -> &'static str {
        "initialization_latch"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.constructs > 1 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} constructions in one mount", state.constructs),
            });
        }
        Ok(())
    }
}

/// No engine session is released more than once.
pub struct ReleaseAtMostOnce;

impl Invariant for ReleaseAtMostOnce {
    fn name(&self) -> &'static str {
        "release_at_most_once"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if let Some((index, count)) =
            state.release_counts.iter().enumerate().find(|(_, count)| **count > 1)
        {
            return Err(Violation {
                invariant: self.name(),
                message: format!("session {index} released {count} times"),
            });
        }
        Ok(())
    }
}

/// `Ready` implies the installed session has exactly one listener, and no
/// session ever gets a second one.
pub struct ReadyIsSubscribed;

impl Invariant for ReadyIsSubscribed {
    fn name(&self) -> &'static str {
        "ready_is_subscribed"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if let Some(count) = state.subscribe_counts.iter().find(|count| **count > 1) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("session subscribed {count} times"),
            });
        }
        if state.state == ConnectionState::Ready && state.live_subscribes != Some(1) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("Ready with listener count {:?}", state.live_subscribes),
            });
        }
        Ok(())
    }
}

/// A session is never constructed before the room is known.
pub struct RoomBeforeSession;

impl Invariant for RoomBeforeSession {
    fn name(&self) -> &'static str {
        "room_before_session"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let started = state.constructs > 0 || state.state != ConnectionState::Uninitialized;
        if started && state.room.is_none() {
            return Err(Violation {
                invariant: self.name(),
                message: format!("state {:?} without a room", state.state),
            });
        }
        Ok(())
    }
}

/// `Failed` if and only if an initialization error is recorded.
pub struct FailedHasMessage;

impl Invariant for FailedHasMessage {
    fn name(&self) -> &'static str {
        "failed_has_message"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let failed = state.state == ConnectionState::Failed;
        if failed != state.init_error.is_some() {
            return Err(Violation {
                invariant: self.name(),
                message: format!("state {:?} with error {:?}", state.state, state.init_error),
            });
        }
        Ok(())
    }
}

/// The log is exactly the messages delivered through the live session, in
/// delivery order: nothing dropped, duplicated, reordered, or appended
/// after release.
pub struct LogMatchesDelivery;

impl Invariant for LogMatchesDelivery {
    fn name(&self) -> &'static str {
        "log_matches_delivery"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let expected: Vec<Message> = state.delivered.iter().cloned().map(Message::from).collect();
        if state.log != expected {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "log has {} messages, {} delivered live",
                    state.log.len(),
                    expected.len()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use antenna_client::InboundMessage;

    use super::*;

    #[test]
    fn second_construction_is_flagged() {
        let state = SessionSnapshot { constructs: 2, room: Some("r".into()), ..Default::default() };
        assert!(InitializationLatch.check(&state).is_err());
    }

    #[test]
    fn double_release_is_flagged() {
        let state = SessionSnapshot { release_counts: vec![1, 2], ..Default::default() };
        assert!(ReleaseAtMostOnce.check(&state).is_err());
    }

    #[test]
    fn ready_without_listener_is_flagged() {
        let state = SessionSnapshot {
            state: ConnectionState::Ready,
            room: Some("r".into()),
            live_subscribes: Some(0),
            ..Default::default()
        };
        assert!(ReadyIsSubscribed.check(&state).is_err());
    }

    #[test]
    fn construction_without_room_is_flagged() {
        let state = SessionSnapshot { constructs: 1, ..Default::default() };
        assert!(RoomBeforeSession.check(&state).is_err());
    }

    #[test]
    fn failed_without_message_is_flagged() {
        let state = SessionSnapshot {
            state: ConnectionState::Failed,
            room: Some("r".into()),
            ..Default::default()
        };
        assert!(FailedHasMessage.check(&state).is_err());
    }

    #[test]
    fn reordered_log_is_flagged() {
        let a = InboundMessage { author_id: "x".into(), timestamp: 1, text: "a".into() };
        let b = InboundMessage { author_id: "x".into(), timestamp: 2, text: "b".into() };
        let state = SessionSnapshot {
            log: vec![b.clone().into(), a.clone().into()],
            delivered: vec![a, b],
            ..Default::default()
        };
        assert!(LogMatchesDelivery.check(&state).is_err());
    }
}
