//! WebSocket transport for the client.
//!
//! Provides [`WsEngine`], an [`Engine`] that speaks the Antenna handshake over
//! a WebSocket connection. This is a thin layer that just moves JSON frames;
//! session semantics remain in the session layer.
//!
//! ```text
//! construct ──> connect ──> Join ──> await Welcome ──> WsSession
//!                                        │ timeout / Error / close
//!                                        ↓
//!                                   EngineError (socket dropped)
//! ```
//!
//! A constructed [`WsSession`] runs two tasks: a writer draining the outbound
//! queue into the socket and a reader parsing inbound frames into a buffer.
//! Subscription attaches a third task forwarding that buffer to the
//! [`InboundSink`], so frames that arrive before subscription are kept in
//! order rather than dropped.

use std::time::Duration;

use antenna_proto::{InboundMessage, OutboundMessage, ProtocolError, SignalMessage};
use futures::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc, task::AbortHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use crate::{
    Engine, EngineError, InboundSink, SendError, Session, SessionParams, SessionTarget,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsReader = futures::stream::SplitStream<WsStream>;
type WsWriter = futures::stream::SplitSink<WsStream, Message>;

/// Time allowed between sending Join and receiving Welcome.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// WebSocket engine configuration.
#[derive(Debug, Clone)]
pub struct WsEngineConfig {
    /// Timeout for completing the Join/Welcome handshake.
    pub handshake_timeout: Duration,
}

impl Default for WsEngineConfig {
    fn default() -> Self {
        Self { handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT }
    }
}

/// Engine over a WebSocket connection.
#[derive(Debug, Clone, Default)]
pub struct WsEngine {
    config: WsEngineConfig,
}

impl WsEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: WsEngineConfig) -> Self {
        Self { config }
    }
}

impl Engine for WsEngine {
    type Session = WsSession;

    async fn construct(&self, params: SessionParams) -> Result<WsSession, EngineError> {
        let (stream, _response) = tokio_tungstenite::connect_async(params.address.as_str())
            .await
            .map_err(|e| EngineError::Connect(e.to_string()))?;
        let (mut writer, mut reader) = stream.split();

        let join = join_message(&params).encode()?;
        writer.send(Message::text(join)).await.map_err(|e| EngineError::Connect(e.to_string()))?;

        let peer_id =
            match tokio::time::timeout(self.config.handshake_timeout, await_welcome(&mut reader))
                .await
            {
                Ok(result) => result?,
                Err(_elapsed) => return Err(EngineError::Handshake("handshake timeout".into())),
            };

        tracing::info!(%peer_id, visitor_id = %params.visitor_id, "handshake complete");
        Ok(WsSession::spawn(writer, reader))
    }
}

/// Live WebSocket session.
///
/// Dropping the session releases it.
pub struct WsSession {
    outbound: Option<mpsc::UnboundedSender<String>>,
    inbound: Option<mpsc::UnboundedReceiver<InboundMessage>>,
    tasks: Vec<AbortHandle>,
}

impl WsSession {
    fn spawn(writer: WsWriter, reader: WsReader) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let writer_task = tokio::spawn(run_writer(writer, outbound_rx));
        let reader_task = tokio::spawn(run_reader(reader, inbound_tx));

        Self {
            outbound: Some(outbound_tx),
            inbound: Some(inbound_rx),
            tasks: vec![writer_task.abort_handle(), reader_task.abort_handle()],
        }
    }
}

impl Session for WsSession {
    fn subscribe(&mut self, sink: InboundSink) {
        let Some(mut inbound) = self.inbound.take() else {
            tracing::warn!(generation = %sink.generation(), "session already has a listener");
            return;
        };

        let forward = tokio::spawn(async move {
            while let Some(message) = inbound.recv().await {
                if !sink.deliver(message) {
                    break;
                }
            }
        });
        self.tasks.push(forward.abort_handle());
    }

    fn send(&self, message: &OutboundMessage) -> Result<(), SendError> {
        let outbound = self.outbound.as_ref().ok_or(SendError::NotOpen)?;
        let frame = message.to_json()?;
        outbound.send(frame).map_err(|_| SendError::NotOpen)
    }

    fn release(&mut self) {
        if self.outbound.take().is_none() {
            return;
        }
        self.inbound = None;
        // Writer (first task) exits on its own once the queue closes, after
        // sending a close frame.
        for task in self.tasks.drain(..).skip(1) {
            task.abort();
        }
        tracing::debug!("websocket session released");
    }
}

impl Drop for WsSession {
    fn drop(&mut self) {
        self.release();
    }
}

fn join_message(params: &SessionParams) -> SignalMessage {
    let token = Some(params.token.clone());
    match &params.target {
        SessionTarget::Global => SignalMessage::Join {
            room: antenna_proto::signal::DEFAULT_ROOM.to_string(),
            token,
            ice_servers: Vec::new(),
        },
        SessionTarget::Room(room) => {
            SignalMessage::Join { room: room.clone(), token, ice_servers: Vec::new() }
        },
        SessionTarget::Transport(options) => SignalMessage::Join {
            room: options.room.clone(),
            token,
            ice_servers: options.ice_servers.clone(),
        },
    }
}

async fn await_welcome(reader: &mut WsReader) -> Result<String, EngineError> {
    while let Some(frame) = reader.next().await {
        let frame = frame.map_err(|e| EngineError::Connect(e.to_string()))?;
        if frame.is_close() {
            return Err(EngineError::Closed);
        }
        if !frame.is_text() {
            continue;
        }

        let text = frame.to_text().map_err(|e| EngineError::Connect(e.to_string()))?;
        match SignalMessage::decode(text)? {
            SignalMessage::Welcome { peer_id } => return Ok(peer_id),
            SignalMessage::Error { message } => return Err(EngineError::Handshake(message)),
            other => {
                return Err(ProtocolError::Unexpected { expected: "Welcome", got: other.kind() }
                    .into());
            },
        }
    }
    Err(EngineError::Closed)
}

async fn run_writer(mut writer: WsWriter, mut outbound: mpsc::UnboundedReceiver<String>) {
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = writer.send(Message::text(frame)).await {
            tracing::warn!(error = %e, "websocket send failed");
            break;
        }
    }
    if let Err(e) = writer.close().await {
        tracing::debug!(error = %e, "websocket close failed");
    }
}

async fn run_reader(mut reader: WsReader, inbound: mpsc::UnboundedSender<InboundMessage>) {
    while let Some(frame) = reader.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "websocket receive failed");
                break;
            },
        };
        if frame.is_close() {
            break;
        }
        if !frame.is_text() {
            continue;
        }

        let parsed = frame
            .to_text()
            .map_err(|e| ProtocolError::Decode(e.to_string()))
            .and_then(InboundMessage::from_json);
        match parsed {
            Ok(message) => {
                if inbound.send(message).is_err() {
                    break;
                }
            },
            Err(e) => tracing::warn!(error = %e, "dropping malformed inbound frame"),
        }
    }
}
