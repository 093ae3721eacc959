//! Client
//!
//! The engine capability consumed by the Antenna session layer. The chat
//! engine is an external collaborator: this crate only names the narrow
//! interface the session layer relies on and the values that cross it.
//!
//! # Components
//!
//! - [`Engine`]: asynchronous session construction
//! - [`Session`]: subscribe / send / release on one live binding
//! - [`InboundSink`]: the single inbound listener, tagged with a
//!   [`SessionGeneration`] so stale callbacks can be told apart
//! - [`Environment`]: randomness for per-session visitor ids
//! - [`connection_address`]: `{ws|wss}://{host}/ws/{visitor-id}[/{room}]`
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::WsEngine`]: engine over a WebSocket connection

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod address;
mod engine;
mod env;
mod error;

#[cfg(feature = "transport")]
pub mod transport;

pub use address::connection_address;
pub use antenna_proto::{IceServer, InboundMessage, OutboundMessage, TransportOptions};
pub use engine::{
    Engine, InboundEnvelope, InboundSink, Session, SessionGeneration, SessionParams, SessionTarget,
};
pub use env::{Environment, SystemEnv};
pub use error::{EngineError, SendError};
