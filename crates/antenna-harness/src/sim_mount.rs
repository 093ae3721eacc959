//! Synchronous mount for pure-mode testing.
//!
//! [`SimMount`] plays the runtime's role without an async executor: it
//! executes every [`AppAction`] immediately against a [`SimEngine`], and
//! pumps inbound deliveries into the app after each step. Remounts are
//! handled like the runtime handles them.

use std::collections::VecDeque;

use antenna_app::{App, AppAction, AppEvent, ChatConfig, InitTicket, Location, RoomId, UrlLocation};
use antenna_client::{EngineError, Environment, InboundEnvelope, InboundMessage, SessionGeneration};
use tokio::sync::mpsc;

use crate::{Construction, RenderedView, SessionSnapshot, SimEngine, SimEnv, SimSession};

/// One runtime's worth of state, driven synchronously.
pub struct SimMount {
    engine: SimEngine,
    env: SimEnv,
    config: ChatConfig,
    location: UrlLocation,
    app: App<SimSession>,
    generation: SessionGeneration,
    inbound_tx: mpsc::UnboundedSender<InboundEnvelope>,
    inbound_rx: mpsc::UnboundedReceiver<InboundEnvelope>,
    held: VecDeque<InitTicket>,
    live_session: Option<usize>,
    constructs_before_mount: usize,
    renders: Vec<RenderedView>,
    quit: bool,
}

impl SimMount {
    /// Create a mount. Call [`SimMount::start`] to run the mount step.
    pub fn new(engine: SimEngine, env: SimEnv, config: ChatConfig, location: UrlLocation) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let generation = SessionGeneration(1);
        let app = App::new(&config.deployment, generation, inbound_tx.clone());

        Self {
            engine,
            env,
            config,
            location,
            app,
            generation,
            inbound_tx,
            inbound_rx,
            held: VecDeque::new(),
            live_session: None,
            constructs_before_mount: 0,
            renders: Vec::new(),
            quit: false,
        }
    }

    /// Mount the app against the current location.
    pub fn start(&mut self) {
        let persisted = self.location.room_param();
        let actions = self.app.start(persisted.as_deref());
        self.process(actions);
    }

    /// Feed an event to the app.
    pub fn handle(&mut self, event: AppEvent) {
        let actions = self.app.handle(event);
        self.process(actions);
    }

    /// Navigate the location to `room` and let the app observe it.
    pub fn navigate(&mut self, room: &str) {
        if let Ok(room) = RoomId::parse(room) {
            self.location.set_room_param(&room);
        }
        self.handle(AppEvent::LocationChanged(self.location.room_param()));
    }

    /// Resolve the oldest held construction. Returns `false` if nothing is
    /// held.
    pub fn resolve_held(&mut self, result: Result<(), EngineError>) -> bool {
        let Some(ticket) = self.held.pop_front() else {
            return false;
        };
        let session = result.map(|()| self.engine.open_session(Vec::new()));
        self.complete(ticket, session);
        true
    }

    /// Deliver a message through the most recent session, then pump.
    pub fn deliver(&mut self, message: InboundMessage) -> bool {
        let delivered = self.engine.deliver_latest(message);
        self.pump();
        delivered
    }

    /// Deliver a message through session `index`, then pump.
    pub fn deliver_to(&mut self, index: usize, message: InboundMessage) -> bool {
        let delivered = self.engine.deliver(index, message);
        self.pump();
        delivered
    }

    /// Release the current mount's session.
    pub fn teardown(&mut self) -> bool {
        self.app.teardown()
    }

    /// Current mount.
    pub fn app(&self) -> &App<SimSession> {
        &self.app
    }

    /// Engine handle.
    pub fn engine(&self) -> &SimEngine {
        &self.engine
    }

    /// Persisted location.
    pub fn location(&self) -> &UrlLocation {
        &self.location
    }

    /// Generation of the current mount.
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    /// Every rendered view, across mounts.
    pub fn renders(&self) -> &[RenderedView] {
        &self.renders
    }

    /// Most recent rendered view.
    pub fn last_render(&self) -> Option<&RenderedView> {
        self.renders.last()
    }

    /// Whether the app asked to quit.
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Constructions currently held by the engine script.
    pub fn held(&self) -> usize {
        self.held.len()
    }

    /// Observable state of the current mount.
    pub fn snapshot(&self) -> SessionSnapshot {
        let constructs =
            self.engine.construct_calls().len().saturating_sub(self.constructs_before_mount);
        SessionSnapshot::capture(&self.app, &self.engine, self.live_session, constructs)
    }

    fn process(&mut self, initial_actions: Vec<AppAction>) {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.renders.push(RenderedView::from(&self.app.view())),
                    AppAction::Quit => self.quit = true,
                    AppAction::PersistRoom(room) => self.location.set_room_param(&room),
                    AppAction::Construct { ticket, room } => self.construct(ticket, &room),
                    AppAction::Remount => pending_actions.extend(self.remount()),
                }
            }
        }
        self.pump();
    }

    fn construct(&mut self, ticket: InitTicket, room: &RoomId) {
        let visitor_id = self.env.visitor_id();
        let construction = match self.config.session_params(room, visitor_id) {
            Ok(params) => self.engine.try_construct(params),
            Err(err) => Construction::Done(Err(err)),
        };

        match construction {
            Construction::Done(result) => self.complete(ticket, result),
            Construction::Held => self.held.push_back(ticket),
        }
    }

    fn complete(&mut self, ticket: InitTicket, result: Result<SimSession, EngineError>) {
        let actions = self.app.complete_initialization(ticket, result);
        if let Some(session) = self.app.session().active() {
            self.live_session = Some(session.index());
        }
        self.process(actions);
    }

    fn remount(&mut self) -> Vec<AppAction> {
        self.app.teardown();
        self.generation = self.generation.next();
        self.app = App::new(&self.config.deployment, self.generation, self.inbound_tx.clone());
        self.live_session = None;
        self.constructs_before_mount = self.engine.construct_calls().len();

        let persisted = self.location.room_param();
        self.app.start(persisted.as_deref())
    }

    fn pump(&mut self) {
        while let Ok(envelope) = self.inbound_rx.try_recv() {
            let actions = self.app.handle(AppEvent::MessageReceived(envelope));
            for action in actions {
                if action == AppAction::Render {
                    self.renders.push(RenderedView::from(&self.app.view()));
                }
            }
        }
    }
}
