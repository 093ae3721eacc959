//! Outbound message dispatch.

use antenna_client::{OutboundMessage, SendError, Session};

use crate::InputBuffer;

/// Why a send was skipped without contacting the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Draft is empty after trimming.
    EmptyDraft,
    /// No live session.
    NoSession,
}

/// Result of a send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Precondition failed; no engine call, draft unchanged.
    Skipped(Validation),
    /// Handed to the engine; draft cleared.
    Sent,
    /// Engine rejected the send; draft unchanged.
    Failed(SendError),
}

/// Validates the draft and forwards it to the session.
///
/// Sends are fire-and-forget: there is no local echo, the log only grows
/// through the inbound stream.
#[derive(Debug, Default)]
pub struct Dispatcher {
    sent: u64,
    failures: u64,
    last_failure: Option<SendError>,
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the trimmed draft through `session`.
    ///
    /// The draft is cleared only when the engine accepts the message.
    pub fn send<S: Session>(
        &mut self,
        draft: &mut InputBuffer,
        session: Option<&S>,
    ) -> DispatchOutcome {
        let text = draft.text().trim();
        if text.is_empty() {
            return DispatchOutcome::Skipped(Validation::EmptyDraft);
        }
        let Some(session) = session else {
            return DispatchOutcome::Skipped(Validation::NoSession);
        };

        let message = OutboundMessage::new(text);
        match session.send(&message) {
            Ok(()) => {
                draft.clear();
                self.sent += 1;
                self.last_failure = None;
                DispatchOutcome::Sent
            },
            Err(err) => {
                tracing::warn!(error = %err, "send failed");
                self.failures += 1;
                self.last_failure = Some(err.clone());
                DispatchOutcome::Failed(err)
            },
        }
    }

    /// Messages handed to the engine.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Rejected sends.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Most recent rejection, cleared by the next successful send.
    pub fn last_failure(&self) -> Option<&SendError> {
        self.last_failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use antenna_client::InboundSink;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<String>>,
        reject: bool,
    }

    impl Session for Recorder {
        fn subscribe(&mut self, _sink: InboundSink) {}

        fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
            if self.reject {
                return Err(SendError::Rejected("socket closed".into()));
            }
            self.sent.borrow_mut().push(message.text.clone());
            Ok(())
        }

        fn release(&mut self) {}
    }

    fn draft(text: &str) -> InputBuffer {
        let mut draft = InputBuffer::new();
        draft.set(text);
        draft
    }

    #[test]
    fn sends_trimmed_text_and_clears_draft() {
        let session = Recorder::default();
        let mut dispatcher = Dispatcher::new();
        let mut buf = draft("  hello  ");

        assert_eq!(dispatcher.send(&mut buf, Some(&session)), DispatchOutcome::Sent);
        assert_eq!(*session.sent.borrow(), ["hello"]);
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn blank_draft_is_skipped() {
        let session = Recorder::default();
        let mut dispatcher = Dispatcher::new();
        let mut buf = draft("   ");

        assert_eq!(
            dispatcher.send(&mut buf, Some(&session)),
            DispatchOutcome::Skipped(Validation::EmptyDraft)
        );
        assert!(session.sent.borrow().is_empty());
        assert_eq!(buf.text(), "   ");
    }

    #[test]
    fn no_session_is_skipped() {
        let mut dispatcher = Dispatcher::new();
        let mut buf = draft("hello");

        assert_eq!(
            dispatcher.send::<Recorder>(&mut buf, None),
            DispatchOutcome::Skipped(Validation::NoSession)
        );
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn rejection_keeps_draft_and_is_recorded() {
        let session = Recorder { reject: true, ..Recorder::default() };
        let mut dispatcher = Dispatcher::new();
        let mut buf = draft("hello");

        let outcome = dispatcher.send(&mut buf, Some(&session));

        assert!(matches!(outcome, DispatchOutcome::Failed(SendError::Rejected(_))));
        assert_eq!(buf.text(), "hello");
        assert_eq!(dispatcher.failures(), 1);
        assert!(dispatcher.last_failure().is_some());
    }
}
