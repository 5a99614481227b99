//! Properties pane.
//!
//! With a field selected, the pane renders that field's property sheet with the same
//! drawing code as any form and routes edits through `apply_property_edit`. With
//! nothing selected it edits the form title and description instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formwright_engine::{FieldEdit, PropertyKey, apply_property_edit, property_sheet};
use formwright_types::{FieldId, FieldValue, FormField};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::app::{App, Effect, Pane};
use crate::ui::components::common::EditorTarget;
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::block;
use crate::ui::widgets::{FieldDrawOptions, field_lines};

const FORM_SETTINGS_ID: &str = "form";
const FORM_ROWS: [&str; 2] = ["Title", "Description"];

#[derive(Debug, Default)]
pub struct PropertiesComponent;

/// What the highlighted row edits.
enum ActiveRow {
    Text { target: EditorTarget, current: String },
    Toggle,
    Options { target: EditorTarget, current: String },
    None,
}

impl PropertiesComponent {
    fn property_row(app: &App, field: &FormField) -> (Vec<PropertyKey>, ActiveRow) {
        let sheet = property_sheet(field);
        let keys = sheet.keys();
        let row = app.properties.row.min(keys.len().saturating_sub(1));
        let Some(key) = keys.get(row).copied() else {
            return (keys, ActiveRow::None);
        };
        let value = sheet.value(key);
        let active = match key {
            PropertyKey::Label | PropertyKey::Placeholder => ActiveRow::Text {
                target: EditorTarget::new(field.id.clone(), row),
                current: value.and_then(FieldValue::as_text).unwrap_or_default().to_string(),
            },
            PropertyKey::Required => ActiveRow::Toggle,
            PropertyKey::Options => {
                let slots = value.and_then(FieldValue::as_list).unwrap_or_default();
                let slot = app.properties.slot.min(slots.len().saturating_sub(1));
                ActiveRow::Options {
                    target: EditorTarget::new(field.id.clone(), row).with_slot(slot),
                    current: slots.get(slot).cloned().unwrap_or_default(),
                }
            }
        };
        (keys, active)
    }

    fn handle_property_keys(app: &mut App, field: &FormField, key: KeyEvent) {
        let (keys, active) = Self::property_row(app, field);
        if keys.is_empty() {
            return;
        }
        let row = app.properties.row.min(keys.len() - 1);
        match key.code {
            KeyCode::Up => {
                app.properties.row = row.saturating_sub(1);
                app.properties.slot = 0;
                return;
            }
            KeyCode::Down => {
                app.properties.row = (row + 1).min(keys.len() - 1);
                app.properties.slot = 0;
                return;
            }
            _ => {}
        }

        let property = keys[row];
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match active {
            ActiveRow::Text { target, current } => {
                app.properties.editor.sync(target, &current);
                if let Some(text) = app.properties.editor.handle_key(key) {
                    apply_property_edit(&mut app.session, property, FieldEdit::SetText(text));
                }
            }
            ActiveRow::Toggle => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    let on = property_sheet(field).value(property).and_then(FieldValue::as_flag).unwrap_or(false);
                    apply_property_edit(&mut app.session, property, FieldEdit::SetFlag(!on));
                }
            }
            ActiveRow::Options { target, current } => match key.code {
                KeyCode::Left => app.properties.slot = target.slot.saturating_sub(1),
                KeyCode::Right => app.properties.slot = target.slot + 1,
                KeyCode::Char('a') if control => {
                    let outcome = apply_property_edit(&mut app.session, property, FieldEdit::AddSlot);
                    if let Some(slots) = outcome.changed_value().and_then(FieldValue::as_list) {
                        app.properties.slot = slots.len().saturating_sub(1);
                    }
                }
                KeyCode::Char('d') if control => {
                    let outcome = apply_property_edit(&mut app.session, property, FieldEdit::RemoveSlot(target.slot));
                    app.properties.editor.release();
                    app.report_outcome(&outcome);
                }
                _ => {
                    let index = target.slot;
                    app.properties.editor.sync(target, &current);
                    if let Some(text) = app.properties.editor.handle_key(key) {
                        apply_property_edit(&mut app.session, property, FieldEdit::SetSlot { index, text });
                    }
                }
            },
            ActiveRow::None => {}
        }
    }

    fn handle_form_keys(app: &mut App, key: KeyEvent) {
        let row = app.properties.row.min(FORM_ROWS.len() - 1);
        match key.code {
            KeyCode::Up => app.properties.row = row.saturating_sub(1),
            KeyCode::Down => app.properties.row = (row + 1).min(FORM_ROWS.len() - 1),
            _ => {
                let definition = app.session.definition();
                let current = if row == 0 { definition.title.clone() } else { definition.description.clone() };
                app.properties.editor.sync(EditorTarget::new(FieldId::from(FORM_SETTINGS_ID), row), &current);
                if let Some(text) = app.properties.editor.handle_key(key) {
                    if row == 0 {
                        app.session.set_title(text);
                    } else {
                        app.session.set_description(text);
                    }
                }
            }
        }
    }

    fn form_lines(app: &App) -> Vec<Line<'static>> {
        let theme = app.theme.as_ref();
        let definition = app.session.definition();
        let row = app.properties.row.min(FORM_ROWS.len() - 1);
        let mut lines = vec![
            Line::from(Span::styled("Form settings", theme.accent_emphasis_style())),
            Line::default(),
        ];
        for (index, (name, value)) in FORM_ROWS.iter().zip([&definition.title, &definition.description]).enumerate() {
            let style = if index == row {
                theme.selection_style().add_modifier(Modifier::BOLD)
            } else {
                theme.text_secondary_style().add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(Span::styled(format!("  {name}"), style)));
            lines.push(Line::from(Span::styled(format!("    [ {value} ]"), theme.text_primary_style())));
        }
        lines.push(Line::default());
        let issues = definition.completeness_issues();
        if issues.is_empty() {
            lines.push(Line::from(Span::styled("Select a field to edit its properties.", theme.text_muted_style())));
        } else {
            for issue in issues {
                lines.push(Line::from(Span::styled(format!("! {issue}"), theme.status_warning())));
            }
        }
        lines
    }

    fn field_property_lines(app: &App, field: &FormField) -> Vec<Line<'static>> {
        let theme = app.theme.as_ref();
        let sheet = property_sheet(field);
        let mut lines = vec![
            Line::from(vec![
                Span::styled(field.label.clone(), theme.accent_emphasis_style()),
                Span::styled(format!("  {} \u{00B7} {}", field.id, field.kind), theme.text_muted_style()),
            ]),
            Line::default(),
        ];
        let views = sheet.views();
        if views.is_empty() {
            lines.push(Line::from(Span::styled(
                "This kind is not understood; its attributes are kept as they are.",
                theme.status_warning(),
            )));
        }
        let row = app.properties.row.min(views.len().saturating_sub(1));
        for (index, view) in views.iter().enumerate() {
            let options = FieldDrawOptions {
                selected: index == row,
                item_cursor: Some(app.properties.slot),
            };
            lines.extend(field_lines(view, theme, options));
        }
        lines
    }
}

impl Component for PropertiesComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Esc {
            app.properties.editor.release();
            app.focus = Pane::Canvas;
            return Vec::new();
        }
        match app.session.selected_field().cloned() {
            Some(field) => Self::handle_property_keys(app, &field, key),
            None => Self::handle_form_keys(app, key),
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let focused = app.focus == Pane::Properties;
        let selected = app.session.selected_field().cloned();
        let lines = match &selected {
            Some(field) => Self::field_property_lines(app, field),
            None => Self::form_lines(app),
        };

        let theme = app.theme.as_ref();
        let outer = block(theme, Some(Pane::Properties.title()), focused);
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);
        let [body, edit_line] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);

        if !focused {
            return;
        }
        let editing = match &selected {
            Some(field) => match Self::property_row(app, field).1 {
                ActiveRow::Text { target, .. } | ActiveRow::Options { target, .. } => app.properties.editor.is_bound_to(&target),
                ActiveRow::Toggle | ActiveRow::None => false,
            },
            None => {
                let row = app.properties.row.min(FORM_ROWS.len() - 1);
                app.properties.editor.is_bound_to(&EditorTarget::new(FieldId::from(FORM_SETTINGS_ID), row))
            }
        };
        if editing {
            app.properties.editor.render_line(frame, edit_line, theme, "\u{270E} ");
        }
    }
}
