//! Canvas: every field in its disabled authoring rendering.
//!
//! The canvas selects, reorders and removes fields. Clicking a control does nothing,
//! except on checkboxes, where it shows or hides the properties panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formwright_engine::{AuthoringSignal, EditOutcome, FieldEdit};
use formwright_types::FieldKind;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::app::{App, Effect, Pane, StatusLevel};
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::block;
use crate::ui::widgets::{FieldDrawOptions, field_lines};

#[derive(Debug, Default)]
pub struct CanvasComponent;

impl CanvasComponent {
    fn move_selected(app: &mut App, delta: isize) {
        let Some(id) = app.session.selected_field_id().cloned() else {
            return;
        };
        let Some(position) = app.session.definition().position(&id) else {
            return;
        };
        app.session.reorder_field(&id, position.saturating_add_signed(delta));
    }

    fn click_selected(app: &mut App) {
        let Some(field) = app.session.selected_field() else {
            return;
        };
        let id = field.id.clone();
        let edit = if field.kind == FieldKind::Checkbox { FieldEdit::SetFlag(true) } else { FieldEdit::Press };
        match app.session.canvas_interaction(&id, edit) {
            EditOutcome::Authoring(AuthoringSignal::ToggleProperties) => {
                let shown = app.session.properties_visible();
                app.ensure_focus_visible();
                app.set_status(StatusLevel::Info, if shown { "Properties shown" } else { "Properties hidden" });
            }
            _ => app.set_status(StatusLevel::Info, "Canvas controls are disabled; try them in the Preview pane"),
        }
    }
}

impl Component for CanvasComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up if shifted => Self::move_selected(app, -1),
            KeyCode::Down if shifted => Self::move_selected(app, 1),
            KeyCode::Char('K') => Self::move_selected(app, -1),
            KeyCode::Char('J') => Self::move_selected(app, 1),
            KeyCode::Up | KeyCode::Char('k') => app.session.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => app.session.move_selection(1),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = app.session.selected_field_id().cloned() {
                    app.session.remove_field(&id);
                    app.ensure_focus_visible();
                    app.set_status(StatusLevel::Info, format!("Removed '{id}'"));
                }
            }
            KeyCode::Char('p') => {
                app.session.toggle_properties();
                app.ensure_focus_visible();
            }
            KeyCode::Esc => {
                app.session.deselect();
                app.ensure_focus_visible();
            }
            KeyCode::Char(' ') | KeyCode::Enter => Self::click_selected(app),
            KeyCode::Char('q') => return app.request_quit(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = app.theme.as_ref();
        let focused = app.focus == Pane::Canvas;
        let selected = app.session.selected_field_id();

        let mut lines: Vec<Line> = Vec::new();
        let mut selected_line = 0usize;
        let definition = app.session.definition();
        let title = if definition.title.is_empty() { "Untitled form" } else { definition.title.as_str() };
        lines.push(Line::from(Span::styled(title.to_string(), theme.accent_emphasis_style())));
        if !definition.description.is_empty() {
            lines.push(Line::from(Span::styled(definition.description.clone(), theme.text_muted_style())));
        }
        lines.push(Line::default());

        let views = app.session.render_canvas();
        if views.is_empty() {
            lines.push(Line::from(Span::styled(
                "No fields yet. Pick a kind in the Fields pane and press Enter.",
                theme.text_muted_style(),
            )));
        }
        for view in &views {
            let is_selected = selected == Some(&view.id);
            if is_selected {
                selected_line = lines.len();
            }
            let options = FieldDrawOptions {
                selected: is_selected,
                item_cursor: None,
            };
            lines.extend(field_lines(view, theme, options));
            lines.push(Line::default());
        }
        let hidden = app.session.fields().len() - views.len();
        if hidden > 0 {
            lines.push(Line::from(Span::styled(
                format!("{hidden} field(s) of unknown kind are kept but not shown"),
                theme.status_warning(),
            )));
        }

        let visible_rows = usize::from(rect.height.saturating_sub(2));
        let scroll = selected_line.saturating_sub(visible_rows.saturating_sub(4));
        let paragraph = Paragraph::new(lines)
            .block(block(theme, Some(Pane::Canvas.title()), focused))
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, rect);
    }
}
