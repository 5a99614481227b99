//! Live preview: every known field rendered interactively against the session's
//! preview values.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formwright_engine::{Control, FieldEdit, FieldView};
use formwright_types::ImageReference;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::app::{App, Effect, Pane, StatusLevel};
use crate::ui::components::common::EditorTarget;
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::block;
use crate::ui::widgets::{FieldDrawOptions, field_lines};

#[derive(Debug, Default)]
pub struct PreviewComponent;

/// Text the inline editor edits for `view`, or `None` when the control takes no typing.
fn editable_text(view: &FieldView, item: usize) -> Option<(EditorTarget, String)> {
    let target = EditorTarget::new(view.id.clone(), 0);
    match &view.control {
        Control::TextInput { value, .. } | Control::DateInput { value, .. } => Some((target, value.clone())),
        Control::DateRange { start, end } => {
            let part = item.min(1);
            let text = if part == 0 { start } else { end };
            Some((EditorTarget::new(view.id.clone(), part), text.clone()))
        }
        Control::ButtonGroup { slots } => {
            let slot = item.min(slots.len().saturating_sub(1));
            let text = slots.get(slot).map(|slot| slot.text.clone()).unwrap_or_default();
            Some((target.with_slot(slot), text))
        }
        // The address query and the image path are scratch text, not part of the value.
        Control::Address { .. } | Control::ImageUpload { .. } => Some((target, String::new())),
        Control::SingleChoice { .. } | Control::Switch { .. } | Control::CheckboxGroup { .. } | Control::MultiChoice { .. } | Control::Button { .. } => None,
    }
}

/// Number of sub-items Left/Right walks over.
fn item_count(control: &Control) -> usize {
    match control {
        Control::CheckboxGroup { items } | Control::MultiChoice { items } => items.len(),
        Control::ButtonGroup { slots } => slots.len(),
        Control::ImageUpload { images } => images.len(),
        Control::DateRange { .. } => 2,
        _ => 0,
    }
}

impl PreviewComponent {
    fn current_view(app: &mut App) -> Option<FieldView> {
        let views = app.session.render_preview();
        if views.is_empty() {
            return None;
        }
        let index = app.preview.field_index.min(views.len() - 1);
        app.preview.select(index);
        views.into_iter().nth(index)
    }

    fn move_field(app: &mut App, delta: isize) {
        let count = app.session.render_preview().len();
        if count == 0 {
            return;
        }
        let next = app.preview.field_index.saturating_add_signed(delta).min(count - 1);
        app.preview.select(next);
        app.preview.editor.release();
    }

    fn edit(app: &mut App, view: &FieldView, edit: FieldEdit) {
        let outcome = app.session.preview_edit(&view.id, edit);
        app.report_outcome(&outcome);
    }

    fn cycle_choice(app: &mut App, view: &FieldView, choices: &[String], selected: Option<usize>, forward: bool) {
        if choices.is_empty() {
            return;
        }
        let next = match (selected, forward) {
            (None, true) => 0,
            (None, false) => choices.len() - 1,
            (Some(index), true) => (index + 1) % choices.len(),
            (Some(index), false) => (index + choices.len() - 1) % choices.len(),
        };
        Self::edit(app, view, FieldEdit::Choose(choices[next].clone()));
    }

    fn handle_control(app: &mut App, view: &FieldView, key: KeyEvent) -> Vec<Effect> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        let item = app.preview.item;
        let count = item_count(&view.control);
        let toggles = matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter);

        match &view.control {
            Control::SingleChoice { choices, selected, .. } => match key.code {
                KeyCode::Left => Self::cycle_choice(app, view, choices, *selected, false),
                KeyCode::Right | KeyCode::Char(' ') => Self::cycle_choice(app, view, choices, *selected, true),
                KeyCode::Backspace | KeyCode::Delete => Self::edit(app, view, FieldEdit::ClearChoice),
                _ => {}
            },
            Control::Switch { on, .. } if toggles => Self::edit(app, view, FieldEdit::SetFlag(!on)),
            Control::CheckboxGroup { items } if toggles => {
                if let Some(entry) = items.get(item) {
                    let edit = FieldEdit::SetOption {
                        option: entry.label.clone(),
                        checked: !entry.checked,
                    };
                    Self::edit(app, view, edit);
                }
            }
            Control::MultiChoice { items } if toggles => {
                if let Some(entry) = items.get(item) {
                    Self::edit(app, view, FieldEdit::ToggleChoice(entry.label.clone()));
                }
            }
            Control::Button { .. } if toggles => Self::edit(app, view, FieldEdit::Press),
            Control::CheckboxGroup { .. } | Control::MultiChoice { .. } | Control::DateRange { .. } | Control::ButtonGroup { .. } | Control::ImageUpload { .. }
                if matches!(key.code, KeyCode::Left | KeyCode::Right) =>
            {
                app.preview.item = if key.code == KeyCode::Left {
                    item.saturating_sub(1)
                } else {
                    (item + 1).min(count.saturating_sub(1))
                };
            }
            Control::ButtonGroup { .. } if control && key.code == KeyCode::Char('a') => {
                Self::edit(app, view, FieldEdit::AddSlot);
                app.preview.item = count;
                app.preview.editor.release();
            }
            Control::ButtonGroup { .. } if control && key.code == KeyCode::Char('d') => {
                Self::edit(app, view, FieldEdit::RemoveSlot(item));
                app.preview.item = item.saturating_sub(1);
                app.preview.editor.release();
            }
            Control::Address { .. } if control && key.code == KeyCode::Char('d') => {
                Self::edit(app, view, FieldEdit::ClearAddress);
            }
            Control::Address { .. } if key.code == KeyCode::Enter => {
                let query = app.preview.editor.state().input().trim().to_string();
                if query.is_empty() {
                    app.set_status(StatusLevel::Warning, "Type an address to look up first");
                    return Vec::new();
                }
                app.set_status(StatusLevel::Info, format!("Looking up '{query}'\u{2026}"));
                return vec![Effect::LookupAddress {
                    field_id: view.id.clone(),
                    query,
                }];
            }
            Control::ImageUpload { .. } if control && key.code == KeyCode::Char('d') => {
                Self::edit(app, view, FieldEdit::RemoveImage(item));
                app.preview.item = item.saturating_sub(1);
            }
            Control::ImageUpload { .. } if key.code == KeyCode::Enter => {
                let path = app.preview.editor.state().input().trim().to_string();
                if !path.is_empty() {
                    Self::edit(app, view, FieldEdit::AddImages(vec![ImageReference::pending(path)]));
                    app.preview.editor.clear();
                }
            }
            _ => {
                let Some((target, current)) = editable_text(view, item) else {
                    return Vec::new();
                };
                let part = target.part;
                let slot = target.slot;
                app.preview.editor.sync(target, &current);
                let Some(text) = app.preview.editor.handle_key(key) else {
                    return Vec::new();
                };
                let edit = match &view.control {
                    Control::DateRange { .. } if part == 0 => FieldEdit::SetRangeStart(text),
                    Control::DateRange { .. } => FieldEdit::SetRangeEnd(text),
                    Control::ButtonGroup { .. } => FieldEdit::SetSlot { index: slot, text },
                    Control::Address { .. } | Control::ImageUpload { .. } => return Vec::new(),
                    _ => FieldEdit::SetText(text),
                };
                Self::edit(app, view, edit);
            }
        }
        Vec::new()
    }
}

impl Component for PreviewComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Up => {
                Self::move_field(app, -1);
                return Vec::new();
            }
            KeyCode::Down => {
                Self::move_field(app, 1);
                return Vec::new();
            }
            KeyCode::Esc => {
                app.session.reset_preview();
                app.preview.editor.release();
                app.set_status(StatusLevel::Info, "Preview values reset");
                return Vec::new();
            }
            _ => {}
        }
        let Some(view) = Self::current_view(app) else {
            return Vec::new();
        };
        Self::handle_control(app, &view, key)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let focused = app.focus == Pane::Preview;
        let views = app.session.render_preview();
        let current = app.preview.field_index.min(views.len().saturating_sub(1));

        let theme = app.theme.as_ref();
        let outer = block(theme, Some(Pane::Preview.title()), focused);
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);
        let [body, edit_line] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let mut lines: Vec<Line> = Vec::new();
        let mut current_line = 0usize;
        if views.is_empty() {
            lines.push(Line::from(Span::styled("Nothing to preview yet.", theme.text_muted_style())));
        }
        for (index, view) in views.iter().enumerate() {
            if index == current {
                current_line = lines.len();
            }
            let options = FieldDrawOptions {
                selected: focused && index == current,
                item_cursor: Some(app.preview.item),
            };
            lines.extend(field_lines(view, theme, options));
        }
        let visible_rows = usize::from(body.height);
        let scroll = current_line.saturating_sub(visible_rows.saturating_sub(4));
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, body);

        if !focused {
            return;
        }
        let Some(view) = views.get(current) else {
            return;
        };
        if let Some((target, _)) = editable_text(view, app.preview.item) {
            let prompt = match view.control {
                Control::Address { .. } => "\u{2302} search: ",
                Control::ImageUpload { .. } => "\u{25A3} path: ",
                _ => "\u{270E} ",
            };
            if app.preview.editor.is_bound_to(&target) || matches!(view.control, Control::Address { .. } | Control::ImageUpload { .. }) {
                app.preview.editor.render_line(frame, edit_line, theme, prompt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_engine::AuthoringSession;
    use formwright_types::{FieldKind, FieldValue};
    use std::path::PathBuf;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(kind: FieldKind) -> (App, formwright_types::FieldId) {
        let mut session = AuthoringSession::new();
        let id = session.add_field(kind);
        (App::new(session, PathBuf::from("form.json")), id)
    }

    #[test]
    fn typing_updates_text_preview() {
        let (mut app, id) = app_with(FieldKind::Email);
        let mut preview = PreviewComponent;
        for character in "ab".chars() {
            preview.handle_key_events(&mut app, press(KeyCode::Char(character)));
        }
        assert_eq!(app.session.preview_value(&id), Some(FieldValue::Text("ab".into())));
    }

    #[test]
    fn address_enter_requests_lookup() {
        let (mut app, id) = app_with(FieldKind::Address);
        let mut preview = PreviewComponent;
        for character in "Main".chars() {
            preview.handle_key_events(&mut app, press(KeyCode::Char(character)));
        }
        assert_eq!(app.session.preview_value(&id), Some(FieldValue::Unset));
        let effects = preview.handle_key_events(&mut app, press(KeyCode::Enter));
        assert_eq!(
            effects,
            vec![Effect::LookupAddress {
                field_id: id,
                query: "Main".into()
            }]
        );
    }

    #[test]
    fn escape_resets_preview_values() {
        let (mut app, id) = app_with(FieldKind::Toggle);
        let mut preview = PreviewComponent;
        preview.handle_key_events(&mut app, press(KeyCode::Char(' ')));
        assert_eq!(app.session.preview_value(&id), Some(FieldValue::Flag(true)));
        preview.handle_key_events(&mut app, press(KeyCode::Esc));
        assert_eq!(app.session.preview_value(&id), Some(FieldValue::Flag(false)));
    }
}
