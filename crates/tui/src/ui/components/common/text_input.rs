//! UTF-8 safe text buffer with cursor management.

use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display columns between the start of the buffer and the cursor.
    pub fn cursor_columns(&self) -> u16 {
        u16::try_from(self.input[..self.cursor].width()).unwrap_or(u16::MAX)
    }

    // ----- Setters -----

    /// Replaces the buffer and parks the cursor at the end.
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor = self.cursor.saturating_add(next.len_utf8());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) -> bool {
        let Some(next) = self.input[self.cursor..].chars().next() else {
            return false;
        };
        let end = self.cursor + next.len_utf8();
        self.input.drain(self.cursor..end);
        true
    }
}
