//! Chat area
//!
//! Displays the message log of the current room, newest at the bottom.

use antenna_app::{Message, RoomId};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;
const AUTHOR_WIDTH: usize = 8;

/// Render the chat area.
pub fn render(frame: &mut Frame, room: &RoomId, messages: &[Message], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(" #{room} "));

    let items: Vec<ListItem> = if messages.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        messages
            .iter()
            .map(|msg| {
                let author: String = msg.author_id.chars().take(AUTHOR_WIDTH).collect();

                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("<{author}>"),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::raw(msg.text.clone()),
                ]))
            })
            .collect()
    };

    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}
