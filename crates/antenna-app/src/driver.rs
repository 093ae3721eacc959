//! Driver trait for abstracting frontend I/O.
//!
//! The [`Driver`] trait decouples the application runtime from specific
//! presentation surfaces. Each frontend implements the trait, while the
//! generic [`crate::Runtime`] handles all orchestration. Network I/O is not
//! part of the driver; it belongs to the [`antenna_client::Engine`].

use std::future::Future;

use crate::{AppEvent, View};

/// Abstracts frontend I/O for the application runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm events, ratatui rendering
/// - **Simulation**: scripted events, recorded views
pub trait Driver {
    /// Platform-specific error type.
    type Error: std::error::Error + 'static;

    /// Wait for the next input event.
    ///
    /// `Ok(None)` means nothing happened; the runtime polls again.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>>;

    /// Render a view.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error>;

    /// Restore the surface and clean up resources.
    fn stop(&mut self);
}
