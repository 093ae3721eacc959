//! Join form
//!
//! Instructions shown while no room is known.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

/// Render the join instructions.
pub fn render(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw("Enter a room name to join."),
        Line::styled("Enter submits, Esc quits.", Style::default().fg(Color::DarkGray)),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Antenna "));

    frame.render_widget(paragraph, area);
}
