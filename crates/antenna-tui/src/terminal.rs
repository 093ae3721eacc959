//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The engine is not the
//! driver's concern; sessions are owned by the runtime.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use antenna_app::{AppEvent, Driver, KeyInput, View};
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::ui;

/// Interval between ticks when no terminal event arrives.
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the terminal for its lifetime: raw mode and the alternate screen
/// are entered on creation and left on [`Driver::stop`] or drop.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    restored: bool,
}

impl TerminalDriver {
    /// Take over the terminal.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, restored: false })
    }

    /// Convert a crossterm key event to `KeyInput`.
    ///
    /// Ctrl+C closes like Esc, since raw mode swallows the signal.
    pub fn convert_key(event: KeyEvent) -> Option<KeyInput> {
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c') => Some(KeyInput::Esc),
                _ => None,
            };
        }

        match event.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        if let Err(err) = disable_raw_mode() {
            tracing::warn!(%err, "failed to leave raw mode");
        }
        if let Err(err) = stdout().execute(LeaveAlternateScreen) {
            tracing::warn!(%err, "failed to leave alternate screen");
        }
        if let Err(err) = self.terminal.show_cursor() {
            tracing::warn!(%err, "failed to show cursor");
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        Ok(Self::convert_key(key_event).map(AppEvent::Key))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    // Input stream ended; nothing more can reach the app.
                    None => Ok(Some(AppEvent::Close)),
                    Some(Ok(_)) => Ok(None),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK_RATE) => Ok(Some(AppEvent::Tick)),
        }
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, view))?;
        Ok(())
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn editing_keys_map_to_inputs() {
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(KeyInput::Char('a'))
        );
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('A'))
        );
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyInput::Enter)
        );
        assert_eq!(TerminalDriver::convert_key(key(KeyCode::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn ctrl_c_closes() {
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyInput::Esc)
        );
        assert_eq!(
            TerminalDriver::convert_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }
}
