//! Session lifecycle scenarios.
//!
//! Each test drives a [`SimMount`] through a concrete scenario and checks
//! both the scenario's expected outcome and the standard invariants.

use antenna_app::{
    AppEvent, ChatConfig, ConnectionState, Deployment, KeyInput, Location, RoomPlacement,
    UrlLocation,
};
use antenna_client::{
    EngineError, IceServer, InboundMessage, OutboundMessage, SendError, SessionTarget,
    TransportOptions,
};
use antenna_harness::{
    ConstructScript, InvariantRegistry, RenderedView, SimEngine, SimEnv, SimMount,
};

fn mount_with(engine: SimEngine, config: ChatConfig, url: &str) -> SimMount {
    let location = UrlLocation::parse(url).unwrap();
    let mut mount = SimMount::new(engine, SimEnv::with_seed(42), config, location);
    mount.start();
    mount
}

fn mount(engine: SimEngine, url: &str) -> SimMount {
    mount_with(engine, ChatConfig::default(), url)
}

fn ready_mount() -> SimMount {
    let mount = mount(SimEngine::new(), "http://localhost:3000/?room=general");
    assert_eq!(mount.app().connection_state(), ConnectionState::Ready);
    mount
}

fn message(text: &str) -> InboundMessage {
    InboundMessage { author_id: "peer".into(), timestamp: 1_700_000_000_000, text: text.into() }
}

fn log_texts(mount: &SimMount) -> Vec<String> {
    mount.app().messages().iter().map(|m| m.text.clone()).collect()
}

fn check(mount: &SimMount, context: &str) {
    InvariantRegistry::standard().assert_all(&mount.snapshot(), context);
}

#[test]
fn room_round_trip_through_join_form() {
    let mut mount = mount(SimEngine::new(), "http://localhost:3000/?theme=dark");
    assert_eq!(mount.last_render(), Some(&RenderedView::JoinPrompt { input: String::new() }));
    assert!(mount.engine().construct_calls().is_empty());

    for c in "general".chars() {
        mount.handle(AppEvent::Key(KeyInput::Char(c)));
    }
    mount.handle(AppEvent::Key(KeyInput::Enter));

    assert_eq!(mount.location().room_param().as_deref(), Some("general"));
    assert!(mount.location().url().query_pairs().any(|(k, v)| k == "theme" && v == "dark"));

    let calls = mount.engine().construct_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, SessionTarget::Room("general".into()));
    assert!(matches!(mount.last_render(), Some(RenderedView::Chat { room, .. }) if room == "general"));
    check(&mount, "after join");
}

#[test]
fn persisted_room_skips_join_form() {
    let mount = mount(SimEngine::new(), "http://localhost:3000/?room=general");

    assert!(!mount.renders().iter().any(|r| matches!(r, RenderedView::JoinPrompt { .. })));
    assert_eq!(mount.engine().construct_calls().len(), 1);
    check(&mount, "after mount");
}

#[test]
fn blank_submission_keeps_join_form() {
    let mut mount = mount(SimEngine::new(), "http://localhost:3000/");

    mount.handle(AppEvent::SubmitRoom("   ".into()));

    assert_eq!(mount.location().room_param(), None);
    assert!(mount.engine().construct_calls().is_empty());
    assert_eq!(mount.app().connection_state(), ConnectionState::Uninitialized);
}

#[test]
fn reobserving_room_never_reconstructs() {
    let mut mount = mount(SimEngine::new(), "http://localhost:3000/?room=general");

    for _ in 0..5 {
        mount.handle(AppEvent::LocationChanged(Some("general".into())));
        mount.handle(AppEvent::SubmitRoom("general".into()));
        mount.handle(AppEvent::Tick);
        check(&mount, "after re-observation");
    }

    assert_eq!(mount.engine().construct_calls().len(), 1);
}

#[test]
fn latch_holds_while_construction_is_pending() {
    let engine = SimEngine::scripted([ConstructScript::Hold]);
    let mut mount = mount(engine, "http://localhost:3000/?room=general");
    assert_eq!(mount.app().connection_state(), ConnectionState::Initializing);

    mount.handle(AppEvent::LocationChanged(Some("general".into())));
    mount.handle(AppEvent::SubmitRoom("general".into()));
    assert_eq!(mount.engine().construct_calls().len(), 1);
    assert_eq!(
        mount.last_render(),
        Some(&RenderedView::Loading { room: Some("general".into()) })
    );

    assert!(mount.resolve_held(Ok(())));
    assert_eq!(mount.app().connection_state(), ConnectionState::Ready);
    check(&mount, "after held resolution");
}

#[test]
fn handshake_timeout_is_terminal() {
    let engine =
        SimEngine::scripted([ConstructScript::Fail(EngineError::Handshake("handshake timeout".into()))]);
    let mut mount = mount(engine, "http://localhost:3000/?room=general");

    assert_eq!(mount.app().connection_state(), ConnectionState::Failed);
    assert_eq!(
        mount.last_render(),
        Some(&RenderedView::Error { message: "handshake timeout".into() })
    );

    mount.handle(AppEvent::Tick);
    mount.handle(AppEvent::LocationChanged(Some("general".into())));
    mount.handle(AppEvent::Key(KeyInput::Enter));

    assert_eq!(mount.engine().construct_calls().len(), 1);
    assert_eq!(mount.app().connection_state(), ConnectionState::Failed);
    check(&mount, "after failure");
}

#[test]
fn blank_drafts_never_reach_engine() {
    let mut mount = ready_mount();

    mount.handle(AppEvent::SetDraft(String::new()));
    mount.handle(AppEvent::Send);
    mount.handle(AppEvent::SetDraft("   ".into()));
    mount.handle(AppEvent::Send);

    assert!(mount.engine().sent().is_empty());
    assert_eq!(mount.app().draft().text(), "   ");
}

#[test]
fn send_without_ready_session_is_noop() {
    let engine = SimEngine::scripted([ConstructScript::Hold]);
    let mut mount = mount(engine, "http://localhost:3000/?room=general");

    mount.handle(AppEvent::SetDraft("hi".into()));
    mount.handle(AppEvent::Send);

    assert!(mount.engine().sent().is_empty());
    assert_eq!(mount.app().draft().text(), "hi");
}

#[test]
fn send_while_failed_is_noop() {
    let engine = SimEngine::scripted([ConstructScript::Fail(EngineError::Closed)]);
    let mut mount = mount(engine, "http://localhost:3000/?room=general");

    mount.handle(AppEvent::SetDraft("hi".into()));
    mount.handle(AppEvent::Send);

    assert!(mount.engine().sent().is_empty());
    assert_eq!(mount.app().draft().text(), "hi");
}

#[test]
fn successful_send_clears_draft() {
    let mut mount = ready_mount();

    mount.handle(AppEvent::SetDraft("Hello".into()));
    mount.handle(AppEvent::Send);

    assert_eq!(mount.engine().sent(), vec![OutboundMessage::new("Hello")]);
    assert_eq!(mount.app().draft().text(), "");
    assert!(mount.app().messages().is_empty());
}

#[test]
fn typed_draft_is_trimmed_and_sent_on_enter() {
    let mut mount = ready_mount();

    for c in "  hey ".chars() {
        mount.handle(AppEvent::Key(KeyInput::Char(c)));
    }
    mount.handle(AppEvent::Key(KeyInput::Enter));

    assert_eq!(mount.engine().sent(), vec![OutboundMessage::new("hey")]);
}

#[test]
fn rejected_send_keeps_draft_and_state() {
    let mut mount = ready_mount();
    mount.engine().set_send_error(Some(SendError::Rejected("transport not open".into())));

    mount.handle(AppEvent::SetDraft("retry me".into()));
    mount.handle(AppEvent::Send);

    assert_eq!(mount.app().draft().text(), "retry me");
    assert_eq!(mount.app().connection_state(), ConnectionState::Ready);
    assert_eq!(mount.app().dispatcher().failures(), 1);
    assert_eq!(
        mount.app().dispatcher().last_failure(),
        Some(&SendError::Rejected("transport not open".into()))
    );

    mount.engine().set_send_error(None);
    mount.handle(AppEvent::Send);

    assert_eq!(mount.engine().sent(), vec![OutboundMessage::new("retry me")]);
    assert_eq!(mount.app().draft().text(), "");
    assert_eq!(mount.app().dispatcher().last_failure(), None);
}

#[test]
fn inbound_order_survives_interleaved_sends() {
    let mut mount = ready_mount();

    for (i, text) in ["e1", "e2", "e3"].into_iter().enumerate() {
        assert!(mount.deliver(message(text)));
        mount.handle(AppEvent::SetDraft(format!("reply {i}")));
        mount.handle(AppEvent::Send);
    }

    assert_eq!(log_texts(&mount), ["e1", "e2", "e3"]);
    assert_eq!(mount.engine().sent().len(), 3);
    check(&mount, "after interleaving");
}

#[test]
fn messages_delivered_at_subscription_are_kept() {
    let engine = SimEngine::scripted([ConstructScript::SucceedWith(vec![
        message("backlog 1"),
        message("backlog 2"),
    ])]);
    let mount = mount(engine, "http://localhost:3000/?room=general");

    assert_eq!(log_texts(&mount), ["backlog 1", "backlog 2"]);
    check(&mount, "after subscription");
}

#[test]
fn teardown_without_session_is_noop() {
    let mut mount = mount(SimEngine::new(), "http://localhost:3000/");

    assert!(!mount.teardown());
    assert!(!mount.teardown());

    assert!(mount.engine().release_counts().is_empty());
}

#[test]
fn teardown_releases_exactly_once() {
    let mut mount = ready_mount();

    assert!(mount.teardown());
    assert!(!mount.teardown());
    assert!(!mount.teardown());

    assert_eq!(mount.engine().release_counts(), [1]);
    check(&mount, "after teardown");
}

#[test]
fn teardown_after_failure_is_noop() {
    let engine = SimEngine::scripted([ConstructScript::Fail(EngineError::Closed)]);
    let mut mount = mount(engine, "http://localhost:3000/?room=general");

    assert!(!mount.teardown());
    assert!(mount.engine().release_counts().is_empty());
}

#[test]
fn deliveries_after_release_are_ignored() {
    let mut mount = ready_mount();
    mount.deliver(message("before"));
    mount.teardown();

    mount.deliver(message("after"));

    assert_eq!(log_texts(&mount), ["before"]);
    assert_eq!(mount.app().ignored_deliveries(), 1);
    check(&mount, "after late delivery");
}

#[test]
fn construction_finishing_after_teardown_is_released() {
    let engine = SimEngine::scripted([ConstructScript::Hold]);
    let mut mount = mount(engine, "http://localhost:3000/?room=general");
    mount.teardown();

    assert!(mount.resolve_held(Ok(())));

    assert_eq!(mount.engine().release_counts(), [1]);
    assert_eq!(mount.engine().subscribe_counts(), [0]);
    assert_eq!(mount.app().connection_state(), ConnectionState::Initializing);
    check(&mount, "after late construction");
}

#[test]
fn esc_closes_and_releases() {
    let mut mount = ready_mount();

    mount.handle(AppEvent::Key(KeyInput::Esc));

    assert!(mount.has_quit());
    assert_eq!(mount.engine().release_counts(), [1]);
}

#[test]
fn changing_room_remounts_with_fresh_latch() {
    let mut mount = ready_mount();
    mount.deliver(message("old room"));

    mount.navigate("random");

    assert_eq!(mount.generation().0, 2);
    let calls = mount.engine().construct_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].target, SessionTarget::Room("random".into()));
    assert_ne!(calls[0].visitor_id, calls[1].visitor_id);
    assert_eq!(mount.engine().release_counts(), [1, 0]);
    assert!(mount.app().messages().is_empty());

    // The released session firing late must not leak into the new mount.
    mount.deliver_to(0, message("stale"));
    assert!(mount.app().messages().is_empty());
    check(&mount, "after remount");
}

#[test]
fn global_deployment_has_no_join_form() {
    let config = ChatConfig { deployment: Deployment::Global, ..ChatConfig::default() };
    let mount = mount_with(SimEngine::new(), config, "http://localhost:3000/");

    assert!(!mount.renders().iter().any(|r| matches!(r, RenderedView::JoinPrompt { .. })));
    let calls = mount.engine().construct_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, SessionTarget::Global);
    assert_eq!(calls[0].address, format!("ws://localhost:3000/ws/{}", calls[0].visitor_id));
    assert_eq!(mount.location().room_param(), None);
}

#[test]
fn path_placement_puts_room_in_address() {
    let config = ChatConfig {
        deployment: Deployment::MultiRoom { placement: RoomPlacement::Path },
        ..ChatConfig::default()
    };
    let mount = mount_with(SimEngine::new(), config, "http://localhost:3000/?room=general");

    let calls = mount.engine().construct_calls();
    assert_eq!(calls[0].address, format!("ws://localhost:3000/ws/{}/general", calls[0].visitor_id));
}

#[test]
fn secure_host_uses_wss() {
    let config = ChatConfig { host: "chat.example.org".into(), secure: true, ..ChatConfig::default() };
    let mount = mount_with(SimEngine::new(), config, "https://chat.example.org/?room=general");

    assert!(mount.engine().construct_calls()[0].address.starts_with("wss://chat.example.org/ws/"));
}

#[test]
fn peer_assisted_passes_assist_endpoints() {
    let ice = vec![
        IceServer::new(["stun:stun.example.org:3478"]),
        IceServer::new(["turn:turn.example.org:3478"]).with_credentials("user", "pass"),
    ];
    let config = ChatConfig {
        deployment: Deployment::PeerAssisted { ice_servers: ice.clone() },
        ..ChatConfig::default()
    };
    let mount = mount_with(SimEngine::new(), config, "http://localhost:3000/?room=general");

    let calls = mount.engine().construct_calls();
    assert_eq!(
        calls[0].target,
        SessionTarget::Transport(TransportOptions { room: "general".into(), ice_servers: ice })
    );
}

#[test]
fn access_token_is_passed_to_engine() {
    let config = ChatConfig { token: "s3cret".into(), ..ChatConfig::default() };
    let mount = mount_with(SimEngine::new(), config, "http://localhost:3000/?room=general");

    assert_eq!(mount.engine().construct_calls()[0].token, "s3cret");
}
