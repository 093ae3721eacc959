//! Status bar
//!
//! Displays connection status, room and the last send failure.

use antenna_app::View;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let connection_status = match view {
        View::JoinPrompt { .. } => Span::styled("Not joined", Style::default().fg(Color::Gray)),
        View::Loading { .. } => Span::styled("Connecting...", Style::default().fg(Color::Yellow)),
        View::Error { .. } => Span::styled("Failed", Style::default().fg(Color::Red)),
        View::Chat { .. } => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let room_info = match view {
        View::Chat { room, messages, .. } => {
            format!(" | Room: #{room} | Messages: {}", messages.len())
        },
        View::Loading { room: Some(room) } => format!(" | Room: #{room}"),
        _ => String::new(),
    };

    let mut spans = vec![
        Span::raw(" "),
        connection_status,
        Span::styled(room_info, Style::default().fg(Color::Gray)),
    ];
    if let View::Chat { send_error: Some(err), .. } = view {
        spans.push(Span::styled(format!(" | {err}"), Style::default().fg(Color::Red)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
