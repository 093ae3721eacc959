//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`antenna_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use antenna_app::{AppEvent, Driver, Message, View};

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimDriverError(pub String);

impl fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// One scripted driver step.
pub enum SimStep {
    /// Deliver an event to the app.
    Event(AppEvent),
    /// Produce no event; lets pending work make progress.
    Idle,
    /// Run a closure (deliver a message, resolve a held construction, ...),
    /// then produce no event.
    Run(Box<dyn FnOnce()>),
    /// Fail the poll.
    Fail(String),
}

impl From<AppEvent> for SimStep {
    fn from(event: AppEvent) -> Self {
        Self::Event(event)
    }
}

/// Owned copy of a rendered [`View`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    /// Join form with its text.
    JoinPrompt {
        /// Join form text.
        input: String,
    },
    /// Loading.
    Loading {
        /// Room being joined.
        room: Option<String>,
    },
    /// Initialization error.
    Error {
        /// Error message.
        message: String,
    },
    /// Live chat.
    Chat {
        /// Current room.
        room: String,
        /// Log at render time.
        messages: Vec<Message>,
        /// Draft text.
        draft: String,
    },
}

impl From<&View<'_>> for RenderedView {
    fn from(view: &View<'_>) -> Self {
        match *view {
            View::JoinPrompt { input } => Self::JoinPrompt { input: input.text().to_string() },
            View::Loading { room } => Self::Loading { room: room.map(ToString::to_string) },
            View::Error { message } => Self::Error { message: message.to_string() },
            View::Chat { room, messages, draft, .. } => Self::Chat {
                room: room.to_string(),
                messages: messages.to_vec(),
                draft: draft.text().to_string(),
            },
        }
    }
}

#[derive(Default)]
struct Recorded {
    renders: Vec<RenderedView>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Plays back a script of [`SimStep`]s; once the script is exhausted it
/// closes the surface. Rendered views are recorded and readable through any
/// clone of [`SimDriver::recorder`].
pub struct SimDriver {
    script: VecDeque<SimStep>,
    recorded: Arc<Mutex<Recorded>>,
    close_when_done: bool,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a driver with an empty script.
    pub fn new() -> Self {
        Self { script: VecDeque::new(), recorded: Arc::default(), close_when_done: true }
    }

    /// Create a driver playing `steps`.
    pub fn scripted<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SimStep>,
    {
        let mut driver = Self::new();
        driver.script.extend(steps.into_iter().map(Into::into));
        driver
    }

    /// Append a step.
    pub fn push(&mut self, step: impl Into<SimStep>) {
        self.script.push_back(step.into());
    }

    /// Keep idling instead of closing once the script is exhausted.
    #[must_use]
    pub fn idle_when_done(mut self) -> Self {
        self.close_when_done = false;
        self
    }

    /// Handle for reading recorded output after the driver has moved into a
    /// runtime.
    pub fn recorder(&self) -> SimRecorder {
        SimRecorder { recorded: Arc::clone(&self.recorded) }
    }

    /// Steps left in the script.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

/// Read side of a [`SimDriver`]'s recordings.
#[derive(Clone)]
pub struct SimRecorder {
    recorded: Arc<Mutex<Recorded>>,
}

impl SimRecorder {
    /// Every rendered view, in order.
    pub fn renders(&self) -> Vec<RenderedView> {
        self.lock().renders.clone()
    }

    /// Most recent rendered view.
    pub fn last_render(&self) -> Option<RenderedView> {
        self.lock().renders.last().cloned()
    }

    /// Whether the runtime stopped the driver.
    pub fn stopped(&self) -> bool {
        self.lock().stopped
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let Some(step) = self.script.pop_front() else {
            if self.close_when_done {
                return Ok(Some(AppEvent::Close));
            }
            tokio::task::yield_now().await;
            return Ok(None);
        };

        match step {
            SimStep::Event(event) => Ok(Some(event)),
            SimStep::Idle => {
                tokio::task::yield_now().await;
                Ok(None)
            },
            SimStep::Run(action) => {
                action();
                Ok(None)
            },
            SimStep::Fail(reason) => Err(SimDriverError(reason)),
        }
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error> {
        let rendered = RenderedView::from(view);
        tracing::trace!(view = view.name(), "render");
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner).renders.push(rendered);
        Ok(())
    }

    fn stop(&mut self) {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner).stopped = true;
    }
}
