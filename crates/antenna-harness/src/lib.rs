//! Deterministic simulation harness for Antenna session testing.
//!
//! Scripted implementations of the [`antenna_client::Engine`],
//! [`antenna_client::Environment`] and [`antenna_app::Driver`] seams so the
//! session layer can be exercised without a network or a terminal.
//!
//! # Pure mode
//!
//! [`SimMount`] executes [`antenna_app::AppAction`]s synchronously against a
//! [`SimEngine`]. Every step is deterministic, which makes it the right tool
//! for property tests.
//!
//! # Runtime mode
//!
//! [`SimDriver`] implements [`antenna_app::Driver`], so the production
//! [`antenna_app::Runtime`] runs unchanged against scripted input.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties against a
//! [`SessionSnapshot`]. Use [`InvariantRegistry::standard()`] for the
//! lifecycle and ordering invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_engine;
pub mod sim_env;
pub mod sim_mount;

pub use invariants::{
    FailedHasMessage, InitializationLatch, Invariant, InvariantRegistry, InvariantResult,
    LogMatchesDelivery, ReadyIsSubscribed, ReleaseAtMostOnce, RoomBeforeSession,
    SessionSnapshot, Violation,
};
pub use sim_driver::{RenderedView, SimDriver, SimDriverError, SimRecorder, SimStep};
pub use sim_engine::{ConstructScript, Construction, SimEngine, SimSession};
pub use sim_env::SimEnv;
pub use sim_mount::SimMount;
