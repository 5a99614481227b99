//! Palette of field kinds. Enter appends a field of the highlighted kind.

use crossterm::event::{KeyCode, KeyEvent};
use formwright_types::FieldKind;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};

use crate::app::{App, Effect, Pane};
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::block;

#[derive(Debug, Default)]
pub struct PaletteComponent {
    list_state: ListState,
}

impl Component for PaletteComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let last = FieldKind::KNOWN.len() - 1;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.palette_index = app.palette_index.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => app.palette_index = (app.palette_index + 1).min(last),
            KeyCode::Home => app.palette_index = 0,
            KeyCode::End => app.palette_index = last,
            KeyCode::Enter | KeyCode::Char(' ') => app.add_palette_field(),
            KeyCode::Char('q') => return app.request_quit(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = app.theme.as_ref();
        let items: Vec<ListItem> = FieldKind::KNOWN
            .iter()
            .map(|kind| {
                ListItem::new(Line::from(vec![
                    Span::styled(kind.label().to_string(), theme.text_primary_style()),
                    Span::styled(format!("  {kind}"), theme.text_muted_style()),
                ]))
            })
            .collect();
        let focused = app.focus == Pane::Palette;
        let list = List::new(items)
            .block(block(theme, Some(Pane::Palette.title()), focused))
            .highlight_style(theme.selection_style())
            .highlight_symbol("+ ");
        self.list_state.select(Some(app.palette_index));
        frame.render_stateful_widget(list, rect, &mut self.list_state);
    }
}
