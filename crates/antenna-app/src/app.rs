//! Application state machine.
//!
//! [`App`] composes one mount of the chat interface: the room resolver, the
//! session manager, the inbound stream and the dispatcher. It is a pure state
//! machine: it consumes [`crate::AppEvent`] inputs and produces
//! [`crate::AppAction`] instructions for the runtime to execute.
//!
//! A mount never changes room in place. When the persisted room changes the
//! app tears its session down and asks for a [`AppAction::Remount`].

use antenna_client::{EngineError, InboundEnvelope, Session, SessionGeneration};
use tokio::sync::mpsc;

use crate::{
    AppAction, AppEvent, Completion, ConnectionState, Deployment, Dispatcher, InitTicket,
    InputBuffer, KeyInput, Message, MessageStream, RoomId, RoomResolver, SessionManager, View,
    dispatch::DispatchOutcome, stream::Delivery,
};

/// Application state machine for one mount.
///
/// No I/O dependencies; fully testable in simulation.
pub struct App<S: Session> {
    /// Global deployment: implicit room, no join form.
    global: bool,
    resolver: RoomResolver,
    session: SessionManager<S>,
    stream: MessageStream,
    dispatcher: Dispatcher,
    /// Join form text.
    join_input: InputBuffer,
    /// Composer text.
    draft: InputBuffer,
}

impl<S: Session> App<S> {
    /// Create a mount. Inbound messages of its session are forwarded to
    /// `inbound` tagged with `generation`.
    pub fn new(
        deployment: &Deployment,
        generation: SessionGeneration,
        inbound: mpsc::UnboundedSender<InboundEnvelope>,
    ) -> Self {
        Self {
            global: !deployment.resolves_rooms(),
            resolver: RoomResolver::new(),
            session: SessionManager::new(generation, inbound),
            stream: MessageStream::new(),
            dispatcher: Dispatcher::new(),
            join_input: InputBuffer::new(),
            draft: InputBuffer::new(),
        }
    }

    /// Mount: resolve the room from the persisted location.
    pub fn start(&mut self, persisted: Option<&str>) -> Vec<AppAction> {
        let room = if self.global {
            self.resolver.resolve_global()
        } else {
            self.resolver.resolve_startup(persisted)
        };

        match room {
            Some(room) => self.begin_session(room),
            None => vec![AppAction::Render],
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(..) => vec![AppAction::Render],
            AppEvent::SubmitRoom(input) => self.submit_room(&input),
            AppEvent::SetDraft(text) => {
                self.draft.set(text);
                vec![AppAction::Render]
            },
            AppEvent::Send => self.send(),
            AppEvent::LocationChanged(room) => self.observe_location(room.as_deref()),
            AppEvent::MessageReceived(envelope) => {
                let live = self.session.is_live(envelope.generation);
                match self.stream.accept(envelope, live) {
                    Delivery::Appended => vec![AppAction::Render],
                    Delivery::Ignored => vec![],
                }
            },
            AppEvent::Close => {
                self.teardown();
                vec![AppAction::Quit]
            },
        }
    }

    /// Hand back the result of an [`AppAction::Construct`].
    pub fn complete_initialization(
        &mut self,
        ticket: InitTicket,
        result: Result<S, EngineError>,
    ) -> Vec<AppAction> {
        match self.session.complete(ticket, result) {
            Completion::Ready | Completion::Failed => vec![AppAction::Render],
            Completion::Discarded => vec![],
        }
    }

    /// Release the session. Idempotent; returns `true` on the call that
    /// released a live session.
    pub fn teardown(&mut self) -> bool {
        self.session.teardown()
    }

    /// Project the current state.
    pub fn view(&self) -> View<'_> {
        let room = self.resolver.room();
        match self.session.state() {
            ConnectionState::Uninitialized if room.is_none() => {
                View::JoinPrompt { input: &self.join_input }
            },
            ConnectionState::Uninitialized | ConnectionState::Initializing => {
                View::Loading { room }
            },
            ConnectionState::Failed => {
                View::Error { message: self.session.failure().unwrap_or("session failed") }
            },
            ConnectionState::Ready => match room {
                Some(room) => View::Chat {
                    room,
                    messages: self.stream.log().messages(),
                    draft: &self.draft,
                    send_error: self.dispatcher.last_failure(),
                },
                None => View::Loading { room },
            },
        }
    }

    /// Connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.session.state()
    }

    /// Room of this mount, once resolved.
    pub fn room(&self) -> Option<&RoomId> {
        self.resolver.room()
    }

    /// Message log, oldest first.
    pub fn messages(&self) -> &[Message] {
        self.stream.log().messages()
    }

    /// Composer draft.
    pub fn draft(&self) -> &InputBuffer {
        &self.draft
    }

    /// Join form text.
    pub fn join_input(&self) -> &InputBuffer {
        &self.join_input
    }

    /// Initialization error, once `Failed`.
    pub fn init_error(&self) -> Option<&str> {
        self.session.failure()
    }

    /// Outbound dispatcher statistics.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Session lifecycle.
    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    /// Deliveries dropped because their session was not live.
    pub fn ignored_deliveries(&self) -> u64 {
        self.stream.ignored()
    }

    fn begin_session(&mut self, room: RoomId) -> Vec<AppAction> {
        match self.session.begin() {
            Some(ticket) => vec![AppAction::Construct { ticket, room }, AppAction::Render],
            None => vec![AppAction::Render],
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Esc {
            return self.handle(AppEvent::Close);
        }

        match self.session.state() {
            ConnectionState::Uninitialized if self.resolver.room().is_none() => {
                if key == KeyInput::Enter {
                    let input = self.join_input.text().to_string();
                    self.submit_room(&input)
                } else if self.join_input.apply(key) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
            ConnectionState::Ready => {
                if key == KeyInput::Enter {
                    self.send()
                } else if self.draft.apply(key) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
            _ => vec![],
        }
    }

    fn submit_room(&mut self, input: &str) -> Vec<AppAction> {
        if self.global {
            tracing::debug!("global deployment ignores room submissions");
            return vec![];
        }

        let Some(room) = self.resolver.submit(input) else {
            return vec![];
        };

        self.join_input.clear();
        let mut actions = vec![AppAction::PersistRoom(room.clone())];
        actions.extend(self.begin_session(room));
        actions
    }

    fn observe_location(&mut self, persisted: Option<&str>) -> Vec<AppAction> {
        if self.global {
            return vec![];
        }

        let observed = persisted.and_then(|room| RoomId::parse(room).ok());
        match (self.resolver.room(), observed) {
            (Some(current), Some(observed)) if *current != observed => {
                tracing::info!(%current, %observed, "persisted room changed, remounting");
                self.teardown();
                vec![AppAction::Remount]
            },
            (None, Some(observed)) => match self.resolver.resolve_startup(Some(observed.as_str())) {
                Some(room) => self.begin_session(room),
                None => vec![],
            },
            _ => vec![],
        }
    }

    fn send(&mut self) -> Vec<AppAction> {
        match self.dispatcher.send(&mut self.draft, self.session.active()) {
            DispatchOutcome::Sent | DispatchOutcome::Failed(_) => vec![AppAction::Render],
            DispatchOutcome::Skipped(reason) => {
                tracing::debug!(?reason, "send skipped");
                vec![]
            },
        }
    }
}
