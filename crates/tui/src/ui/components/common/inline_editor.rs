//! Text editor bound to one editable spot of a rendered form.
//!
//! Views are re-rendered from the session after every edit, so the editor keeps its own
//! buffer and cursor and only reloads them when the spot it is bound to changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formwright_types::FieldId;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::TextInputState;
use crate::ui::theme::Theme;

/// Editable spot: a field, the part of it being edited (property row, date part) and
/// the slot within that part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorTarget {
    pub field: FieldId,
    pub part: usize,
    pub slot: usize,
}

impl EditorTarget {
    pub fn new(field: FieldId, part: usize) -> Self {
        Self { field, part, slot: 0 }
    }

    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = slot;
        self
    }
}

#[derive(Debug, Default)]
pub struct InlineEditor {
    state: TextInputState,
    target: Option<EditorTarget>,
}

impl InlineEditor {
    /// Binds the editor to `target`, loading `current` when the target changed.
    pub fn sync(&mut self, target: EditorTarget, current: &str) {
        if self.target.as_ref() != Some(&target) {
            self.state.set_input(current);
            self.target = Some(target);
        }
    }

    /// Forgets the binding so the next `sync` reloads from the model.
    pub fn release(&mut self) {
        self.target = None;
    }

    pub fn is_bound_to(&self, target: &EditorTarget) -> bool {
        self.target.as_ref() == Some(target)
    }

    pub fn state(&self) -> &TextInputState {
        &self.state
    }

    pub fn clear(&mut self) {
        self.state.set_input(String::new());
    }

    /// Draws the buffer on one line after `prompt` and places the terminal cursor in it.
    pub fn render_line(&self, frame: &mut Frame, rect: Rect, theme: &dyn Theme, prompt: &str) {
        let line = Line::from(vec![
            Span::styled(prompt.to_string(), theme.accent_primary_style()),
            Span::styled(self.state.input().to_string(), theme.text_primary_style()),
        ]);
        frame.render_widget(Paragraph::new(line), rect);
        let prompt_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
        let x = rect.x.saturating_add(prompt_width).saturating_add(self.state.cursor_columns());
        frame.set_cursor_position(Position::new(x.min(rect.right().saturating_sub(1)), rect.y));
    }

    /// Applies a key to the buffer. Returns the new text when the buffer changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        let typing = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let changed = match key.code {
            KeyCode::Char(character) if typing => {
                self.state.insert_char(character);
                true
            }
            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Delete => self.state.delete(),
            KeyCode::Left => {
                self.state.move_left();
                false
            }
            KeyCode::Right => {
                self.state.move_right();
                false
            }
            KeyCode::Home => {
                self.state.move_home();
                false
            }
            KeyCode::End => {
                self.state.move_end();
                false
            }
            _ => false,
        };
        changed.then(|| self.state.input().to_string())
    }
}
