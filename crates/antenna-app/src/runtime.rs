//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: the current mount's state machine
//! - [`Engine`]: session construction
//! - [`Driver`]: platform-specific frontend I/O
//!
//! Everything runs on one cooperative task. Inbound messages, construction
//! results and frontend input are interleaved by a biased `select!`, so
//! inbound messages are appended in the order the engine delivered them.

use antenna_client::{Engine, EngineError, Environment, InboundEnvelope, SessionGeneration};
use futures::{FutureExt, StreamExt, future::LocalBoxFuture, stream::FuturesUnordered};
use tokio::sync::mpsc;

use crate::{App, AppAction, AppEvent, ChatConfig, Driver, InitTicket, Location, RoomId};

type Initialization<S> = (InitTicket, Result<S, EngineError>);

enum Step<S> {
    Inbound(InboundEnvelope),
    Initialized(InitTicket, Result<S, EngineError>),
    Input(Option<AppEvent>),
}

/// Generic runtime that orchestrates App, Engine, and Driver.
///
/// # Type Parameters
///
/// - `E`: External chat engine
/// - `D`: Platform-specific frontend driver
/// - `N`: Environment providing visitor ids
pub struct Runtime<E, D, N>
where
    E: Engine,
    D: Driver,
    N: Environment,
{
    engine: E,
    driver: D,
    env: N,
    config: ChatConfig,
    location: Box<dyn Location>,
    app: App<E::Session>,
    generation: SessionGeneration,
    inbound_tx: mpsc::UnboundedSender<InboundEnvelope>,
    inbound_rx: mpsc::UnboundedReceiver<InboundEnvelope>,
    pending: FuturesUnordered<LocalBoxFuture<'static, Initialization<E::Session>>>,
}

impl<E, D, N> Runtime<E, D, N>
where
    E: Engine,
    D: Driver,
    N: Environment,
{
    /// Create a runtime. Nothing happens until [`Runtime::run`].
    pub fn new(
        engine: E,
        driver: D,
        env: N,
        location: impl Location + 'static,
        config: ChatConfig,
    ) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let generation = SessionGeneration(1);
        let app = App::new(&config.deployment, generation, inbound_tx.clone());

        Self {
            engine,
            driver,
            env,
            config,
            location: Box::new(location),
            app,
            generation,
            inbound_tx,
            inbound_rx,
            pending: FuturesUnordered::new(),
        }
    }

    /// Run the main event loop until the app quits.
    ///
    /// On exit the current session is released and the driver stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error. The session
    /// is released before returning.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        let result = self.event_loop().await;

        self.app.teardown();
        self.driver.stop();
        result
    }

    async fn event_loop(&mut self) -> Result<(), D::Error> {
        let persisted = self.location.room_param();
        let actions = self.app.start(persisted.as_deref());
        if self.process_actions(actions)? {
            return Ok(());
        }

        loop {
            let step = tokio::select! {
                biased;

                Some(envelope) = self.inbound_rx.recv() => Step::Inbound(envelope),
                Some((ticket, result)) = self.pending.next() => Step::Initialized(ticket, result),
                event = self.driver.poll_event() => Step::Input(event?),
            };

            let actions = match step {
                Step::Inbound(envelope) => self.app.handle(AppEvent::MessageReceived(envelope)),
                Step::Initialized(ticket, result) => {
                    self.app.complete_initialization(ticket, result)
                },
                Step::Input(Some(AppEvent::LocationChanged(room))) => self.navigate(room.as_deref()),
                Step::Input(Some(event)) => self.app.handle(event),
                Step::Input(None) => continue,
            };

            if self.process_actions(actions)? {
                return Ok(());
            }
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app.view())?,
                    AppAction::Quit => return Ok(true),
                    AppAction::PersistRoom(room) => {
                        self.location.set_room_param(&room);
                        tracing::debug!(%room, "room persisted");
                    },
                    AppAction::Construct { ticket, room } => self.start_construction(ticket, &room),
                    AppAction::Remount => pending_actions.extend(self.remount()),
                }
            }
        }
        Ok(false)
    }

    fn start_construction(&mut self, ticket: InitTicket, room: &RoomId) {
        let visitor_id = self.env.visitor_id();
        let params = self.config.session_params(room, visitor_id);
        let engine = self.engine.clone();

        tracing::info!(%room, %visitor_id, generation = %ticket.generation(), "constructing session");

        self.pending.push(
            async move {
                let result = match params {
                    Ok(params) => engine.construct(params).await,
                    Err(err) => Err(err),
                };
                (ticket, result)
            }
            .boxed_local(),
        );
    }

    /// The surface navigated to `room`: persist it, then let the app observe
    /// the location.
    fn navigate(&mut self, room: Option<&str>) -> Vec<AppAction> {
        if let Some(room) = room.and_then(|r| RoomId::parse(r).ok()) {
            self.location.set_room_param(&room);
        }
        let persisted = self.location.room_param();
        self.app.handle(AppEvent::LocationChanged(persisted))
    }

    fn remount(&mut self) -> Vec<AppAction> {
        self.app.teardown();
        self.generation = self.generation.next();
        self.app = App::new(&self.config.deployment, self.generation, self.inbound_tx.clone());
        tracing::info!(generation = %self.generation, "remounted");

        let persisted = self.location.room_param();
        self.app.start(persisted.as_deref())
    }

    /// Current mount.
    pub fn app(&self) -> &App<E::Session> {
        &self.app
    }

    /// Persisted location.
    pub fn location(&self) -> &dyn Location {
        self.location.as_ref()
    }

    /// Frontend driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Generation of the current mount.
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }
}
