//! Scripted engine.
//!
//! [`SimEngine`] records every construction, send, subscription and release
//! so tests can assert on how the session layer drives the engine. Each
//! construction follows the next [`ConstructScript`] step; with the script
//! exhausted, constructions succeed.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use antenna_client::{
    Engine, EngineError, InboundMessage, InboundSink, OutboundMessage, SendError, Session,
    SessionParams,
};
use tokio::sync::oneshot;

/// How one construction resolves.
#[derive(Debug, Clone)]
pub enum ConstructScript {
    /// Resolve with a session.
    Succeed,
    /// Resolve with a session that delivers these messages as soon as it is
    /// subscribed.
    SucceedWith(Vec<InboundMessage>),
    /// Resolve with an error.
    Fail(EngineError),
    /// Stay pending until [`SimEngine::resolve_held`].
    Hold,
}

/// Result of [`SimEngine::try_construct`].
pub enum Construction {
    /// Resolved immediately.
    Done(Result<SimSession, EngineError>),
    /// Held by the script.
    Held,
}

#[derive(Default)]
struct SessionRecord {
    sink: Option<InboundSink>,
    subscribes: u32,
    releases: u32,
    preload: Vec<InboundMessage>,
    delivered_live: Vec<InboundMessage>,
}

#[derive(Default)]
struct EngineState {
    script: VecDeque<ConstructScript>,
    constructs: Vec<SessionParams>,
    sessions: Vec<SessionRecord>,
    sent: Vec<OutboundMessage>,
    send_error: Option<SendError>,
    held: VecDeque<oneshot::Sender<Result<(), EngineError>>>,
}

/// Scripted [`Engine`]. Clones share state.
#[derive(Clone, Default)]
pub struct SimEngine {
    state: Arc<Mutex<EngineState>>,
}

impl SimEngine {
    /// Engine whose constructions all succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine following `steps`, then succeeding.
    pub fn scripted(steps: impl IntoIterator<Item = ConstructScript>) -> Self {
        let engine = Self::new();
        engine.lock().script.extend(steps);
        engine
    }

    /// Append a step to the script.
    pub fn push_script(&self, step: ConstructScript) {
        self.lock().script.push_back(step);
    }

    /// Record a construction and resolve it per the script, without
    /// awaiting.
    pub fn try_construct(&self, params: SessionParams) -> Construction {
        let step = {
            let mut state = self.lock();
            state.constructs.push(params);
            state.script.pop_front().unwrap_or(ConstructScript::Succeed)
        };

        match step {
            ConstructScript::Succeed => Construction::Done(Ok(self.open_session(Vec::new()))),
            ConstructScript::SucceedWith(preload) => {
                Construction::Done(Ok(self.open_session(preload)))
            },
            ConstructScript::Fail(err) => Construction::Done(Err(err)),
            ConstructScript::Hold => Construction::Held,
        }
    }

    /// Create a session directly, bypassing the script.
    pub fn open_session(&self, preload: Vec<InboundMessage>) -> SimSession {
        let mut state = self.lock();
        let index = state.sessions.len();
        state.sessions.push(SessionRecord { preload, ..SessionRecord::default() });
        SimSession { engine: self.clone(), index }
    }

    /// Resolve the oldest held construction. Returns `false` if none is
    /// held or its receiver is gone.
    pub fn resolve_held(&self, result: Result<(), EngineError>) -> bool {
        let Some(tx) = self.lock().held.pop_front() else {
            return false;
        };
        tx.send(result).is_ok()
    }

    /// Push a message through session `index`'s listener, as the engine
    /// would on arrival. Returns `false` if the session has no listener or
    /// the listener is gone.
    pub fn deliver(&self, index: usize, message: InboundMessage) -> bool {
        let mut state = self.lock();
        let Some(record) = state.sessions.get_mut(index) else {
            return false;
        };
        let Some(sink) = record.sink.clone() else {
            return false;
        };
        if record.releases == 0 {
            record.delivered_live.push(message.clone());
        }
        sink.deliver(message)
    }

    /// Deliver through the most recently created session.
    pub fn deliver_latest(&self, message: InboundMessage) -> bool {
        let latest = self.lock().sessions.len().checked_sub(1);
        latest.is_some_and(|index| self.deliver(index, message))
    }

    /// Make every send fail with `error` until cleared with `None`.
    pub fn set_send_error(&self, error: Option<SendError>) {
        self.lock().send_error = error;
    }

    /// Parameters of every construction, in order.
    pub fn construct_calls(&self) -> Vec<SessionParams> {
        self.lock().constructs.clone()
    }

    /// Messages accepted by any session, in order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.lock().sent.clone()
    }

    /// Number of sessions created.
    pub fn sessions_created(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Release calls per session.
    pub fn release_counts(&self) -> Vec<u32> {
        self.lock().sessions.iter().map(|s| s.releases).collect()
    }

    /// Subscribe calls per session.
    pub fn subscribe_counts(&self) -> Vec<u32> {
        self.lock().sessions.iter().map(|s| s.subscribes).collect()
    }

    /// Messages delivered through session `index` before it was released.
    pub fn delivered_live(&self, index: usize) -> Vec<InboundMessage> {
        self.lock().sessions.get(index).map(|s| s.delivered_live.clone()).unwrap_or_default()
    }

    /// Constructions currently held.
    pub fn held(&self) -> usize {
        self.lock().held.len()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Engine for SimEngine {
    type Session = SimSession;

    async fn construct(&self, params: SessionParams) -> Result<SimSession, EngineError> {
        if let Construction::Done(result) = self.try_construct(params) {
            return result;
        }

        let (tx, rx) = oneshot::channel();
        self.lock().held.push_back(tx);
        match rx.await {
            Ok(Ok(())) => Ok(self.open_session(Vec::new())),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(EngineError::Closed),
        }
    }
}

/// Session created by [`SimEngine`].
pub struct SimSession {
    engine: SimEngine,
    index: usize,
}

impl SimSession {
    /// Position of this session in the engine's records.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Session for SimSession {
    fn subscribe(&mut self, sink: InboundSink) {
        let mut state = self.engine.lock();
        let Some(record) = state.sessions.get_mut(self.index) else {
            return;
        };
        record.subscribes += 1;
        if record.sink.is_some() {
            tracing::warn!(index = self.index, "second listener ignored");
            return;
        }

        for message in std::mem::take(&mut record.preload) {
            record.delivered_live.push(message.clone());
            sink.deliver(message);
        }
        record.sink = Some(sink);
    }

    fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        let mut state = self.engine.lock();
        let released = state.sessions.get(self.index).is_none_or(|s| s.releases > 0);
        if released {
            return Err(SendError::NotOpen);
        }
        if let Some(err) = state.send_error.clone() {
            return Err(err);
        }
        state.sent.push(message.clone());
        Ok(())
    }

    fn release(&mut self) {
        if let Some(record) = self.engine.lock().sessions.get_mut(self.index) {
            record.releases += 1;
        }
    }
}
