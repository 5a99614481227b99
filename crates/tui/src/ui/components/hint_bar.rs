//! Hint bar component for keyboard shortcuts and status messages.

use ratatui::{Frame, layout::Rect};

use crate::app::App;
use crate::ui::components::component::Component;

#[derive(Debug, Default)]
pub struct HintBarComponent;

impl Component for HintBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        crate::ui::widgets::draw_hints(frame, rect, app);
    }
}
