//! Terminal-agnostic keyboard input and the text buffers it edits.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (submit).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (close).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Single-line text buffer with a cursor.
///
/// Backs both the join form and the draft. The cursor counts characters, not
/// bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the text, cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply an editing key.
    ///
    /// Returns `true` if the buffer or cursor changed. Enter and Esc are not
    /// editing keys and always return `false`.
    pub fn apply(&mut self, key: KeyInput) -> bool {
        let len = self.text.chars().count();
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                true
            },
            KeyInput::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
                true
            },
            KeyInput::Delete if self.cursor < len => {
                let at = self.byte_offset(self.cursor);
                self.text.remove(at);
                true
            },
            KeyInput::Left if self.cursor > 0 => {
                self.cursor -= 1;
                true
            },
            KeyInput::Right if self.cursor < len => {
                self.cursor += 1;
                true
            },
            KeyInput::Home if self.cursor > 0 => {
                self.cursor = 0;
                true
            },
            KeyInput::End if self.cursor < len => {
                self.cursor = len;
                true
            },
            _ => false,
        }
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text.char_indices().nth(chars).map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputBuffer {
        let mut buffer = InputBuffer::new();
        for c in text.chars() {
            buffer.apply(KeyInput::Char(c));
        }
        buffer
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut buffer = typed("helo");
        buffer.apply(KeyInput::Left);
        buffer.apply(KeyInput::Char('l'));

        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor(), 4);
    }

    #[test]
    fn backspace_and_delete() {
        let mut buffer = typed("abc");
        buffer.apply(KeyInput::Backspace);
        assert_eq!(buffer.text(), "ab");

        buffer.apply(KeyInput::Home);
        buffer.apply(KeyInput::Delete);
        assert_eq!(buffer.text(), "b");

        // Backspace at start is a no-op
        assert!(!buffer.apply(KeyInput::Backspace));
        assert_eq!(buffer.text(), "b");
    }

    #[test]
    fn multibyte_characters_edit_cleanly() {
        let mut buffer = typed("héllo");
        buffer.apply(KeyInput::Home);
        buffer.apply(KeyInput::Right);
        buffer.apply(KeyInput::Delete);

        assert_eq!(buffer.text(), "hllo");
    }

    #[test]
    fn set_moves_cursor_to_end_and_clear_resets() {
        let mut buffer = InputBuffer::new();
        buffer.set("draft");
        assert_eq!(buffer.cursor(), 5);

        buffer.clear();
        assert_eq!(buffer.text(), "");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn submit_keys_do_not_edit() {
        let mut buffer = typed("x");
        assert!(!buffer.apply(KeyInput::Enter));
        assert!(!buffer.apply(KeyInput::Esc));
        assert_eq!(buffer.text(), "x");
    }
}
