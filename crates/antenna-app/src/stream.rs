//! Inbound message stream.

use antenna_client::InboundEnvelope;

use crate::Message;

/// Append-only message log in arrival order.
///
/// Never reordered, deduplicated, or truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// No messages yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn append(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// Outcome of an inbound delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Appended to the log.
    Appended,
    /// Session was not live; nothing changed.
    Ignored,
}

/// Single consumer of the session's inbound stream.
#[derive(Debug, Default)]
pub struct MessageStream {
    log: MessageLog,
    ignored: u64,
}

impl MessageStream {
    /// Create a stream with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept one delivery. `live` is whether the delivering session is the
    /// current, unreleased one.
    pub fn accept(&mut self, envelope: InboundEnvelope, live: bool) -> Delivery {
        if !live {
            self.ignored += 1;
            tracing::debug!(generation = %envelope.generation, "ignoring delivery from stale session");
            return Delivery::Ignored;
        }

        self.log.append(envelope.message.into());
        Delivery::Appended
    }

    /// The log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Deliveries dropped because their session was not live.
    pub fn ignored(&self) -> u64 {
        self.ignored
    }
}
