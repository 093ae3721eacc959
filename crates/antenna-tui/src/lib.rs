//! Terminal UI for Antenna
//!
//! A thin shell over [`antenna_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`antenna_app::Runtime`].
//!
//! This crate only handles terminal rendering and command-line
//! configuration.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod terminal;
pub mod ui;

pub use antenna_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime, View};
pub use config::{Args, ConfigError, Mode};
pub use terminal::{TerminalDriver, TerminalError};
