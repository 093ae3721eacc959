//! Wire protocol for Antenna
//!
//! JSON shapes exchanged with the chat engine: the user-level chat messages
//! ([`OutboundMessage`], [`InboundMessage`]), the transport-assist endpoint
//! descriptors used by the peer-assisted deployment ([`IceServer`],
//! [`TransportOptions`]), and the handshake envelope ([`SignalMessage`]).
//!
//! Everything here is plain data. Connection handling lives in
//! `antenna-client`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod message;
pub mod signal;

pub use errors::{ProtocolError, Result};
pub use message::{IceServer, InboundMessage, OutboundMessage, TransportOptions};
pub use signal::SignalMessage;
