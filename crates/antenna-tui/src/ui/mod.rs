//! UI rendering
//!
//! Rendering functions that convert a [`View`] into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking the view and
//! drawing into a frame.

mod chat;
mod input;
mod join;
mod status;

use antenna_app::View;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &View<'_>) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    match *view {
        View::JoinPrompt { input } => {
            join::render(frame, *main_area);
            input::render(frame, " Room ", input, *input_area);
        },
        View::Loading { room } => {
            let text =
                room.map_or_else(|| "Connecting...".to_string(), |r| format!("Joining #{r}..."));
            notice(frame, &text, Color::Yellow, *main_area);
        },
        View::Error { message } => notice(frame, message, Color::Red, *main_area),
        View::Chat { room, messages, draft, .. } => {
            chat::render(frame, room, messages, *main_area);
            input::render(frame, " Message ", draft, *input_area);
        },
    }

    status::render(frame, view, *status_area);
}

/// Single-paragraph main area for the loading and error views.
fn notice(frame: &mut Frame, text: &str, color: Color, area: Rect) {
    let paragraph = Paragraph::new(Line::styled(text.to_string(), Style::default().fg(color)))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use antenna_app::{InputBuffer, Message, RoomId};
    use antenna_client::SendError;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn rendered(view: &View<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, view)).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    fn message(author: &str, text: &str) -> Message {
        Message { author_id: author.into(), timestamp: 0, text: text.into() }
    }

    #[test]
    fn join_prompt_shows_typed_room() {
        let mut input = InputBuffer::new();
        input.set("general");

        let screen = rendered(&View::JoinPrompt { input: &input });

        assert!(screen.contains("Enter a room name"));
        assert!(screen.contains("> general"));
    }

    #[test]
    fn loading_names_room() {
        let room = RoomId::parse("general").unwrap();
        let screen = rendered(&View::Loading { room: Some(&room) });

        assert!(screen.contains("Joining #general..."));
    }

    #[test]
    fn error_shows_engine_text() {
        let screen = rendered(&View::Error { message: "handshake timeout" });

        assert!(screen.contains("handshake timeout"));
        assert!(screen.contains("Failed"));
    }

    #[test]
    fn chat_shows_log_and_draft() {
        let room = RoomId::parse("general").unwrap();
        let messages = [message("alice", "hello"), message("bob", "hi there")];
        let mut draft = InputBuffer::new();
        draft.set("typing");

        let screen = rendered(&View::Chat {
            room: &room,
            messages: &messages,
            draft: &draft,
            send_error: None,
        });

        assert!(screen.contains("#general"));
        assert!(screen.contains("<alice> hello"));
        assert!(screen.contains("<bob> hi there"));
        assert!(screen.contains("> typing"));
    }

    #[test]
    fn chat_shows_send_failure() {
        let room = RoomId::parse("general").unwrap();
        let draft = InputBuffer::new();
        let error = SendError::NotOpen;

        let screen = rendered(&View::Chat {
            room: &room,
            messages: &[],
            draft: &draft,
            send_error: Some(&error),
        });

        assert!(screen.contains("transport not open"));
    }
}
