//! Component system for the authoring TUI.
//!
//! Components are self-contained panes. They handle keys while focused, update the
//! shared [`App`] (and through it the authoring session), and render themselves into a
//! provided `Rect`. Anything that leaves the process (writing files, talking to an
//! address service, quitting) is reported back as an [`Effect`].

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::app::{App, Effect};

pub(crate) trait Component {
    /// Handle key events while the component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
