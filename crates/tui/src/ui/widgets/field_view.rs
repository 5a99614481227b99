//! Draws interpreter view models as styled terminal lines.
//!
//! The same drawing is used by the canvas (disabled), the preview (interactive) and the
//! properties panel, which renders its property sheet like any other form.

use formwright_engine::{ChoiceItem, ChoiceStyle, Control, FieldView, SlotView, SwitchStyle, TextInputKind};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::ui::theme::{
    Theme,
    theme_helpers::{create_checkbox, create_radio},
};

/// Drawing options for one field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldDrawOptions {
    /// Whole field is highlighted (canvas selection or preview focus).
    pub selected: bool,
    /// Sub-item under the cursor (option, slot, image, date part).
    pub item_cursor: Option<usize>,
}

/// Lines for one field: a header with label and kind, then the control.
pub fn field_lines(view: &FieldView, theme: &dyn Theme, options: FieldDrawOptions) -> Vec<Line<'static>> {
    let header_style = if options.selected {
        theme.selection_style().add_modifier(Modifier::BOLD)
    } else {
        theme.text_secondary_style().add_modifier(Modifier::BOLD)
    };
    let marker = if options.selected { "\u{25B8} " } else { "  " };
    let mut header = vec![Span::styled(format!("{marker}{}", view.label), header_style)];
    if view.required {
        header.push(Span::styled(" *", theme.status_error()));
    }
    header.push(Span::styled(format!("  {}", view.kind), theme.text_muted_style()));

    let control_style = if view.disabled {
        theme.text_muted_style()
    } else {
        theme.text_primary_style()
    };
    let cursor_style = theme.accent_emphasis_style().add_modifier(Modifier::REVERSED);
    let painter = Painter {
        theme,
        base: control_style,
        cursor: cursor_style,
        item_cursor: options.item_cursor.filter(|_| options.selected && !view.disabled),
    };

    let mut lines = vec![Line::from(header)];
    lines.extend(painter.control_lines(&view.control));
    lines
}

struct Painter<'t> {
    theme: &'t dyn Theme,
    base: Style,
    cursor: Style,
    item_cursor: Option<usize>,
}

impl Painter<'_> {
    fn item_style(&self, index: usize) -> Style {
        if self.item_cursor == Some(index) { self.cursor } else { self.base }
    }

    fn indent(spans: Vec<Span<'static>>) -> Line<'static> {
        let mut line = vec![Span::raw("    ")];
        line.extend(spans);
        Line::from(line)
    }

    fn placeholder_or(&self, value: &str, placeholder: Option<&str>, fallback: &str) -> Span<'static> {
        if value.is_empty() {
            Span::styled(placeholder.unwrap_or(fallback).to_string(), self.theme.text_muted_style().add_modifier(Modifier::ITALIC))
        } else {
            Span::styled(value.to_string(), self.base)
        }
    }

    fn control_lines(&self, control: &Control) -> Vec<Line<'static>> {
        match control {
            Control::TextInput { input, value, placeholder } => {
                let fallback = match input {
                    TextInputKind::Email => "name@example.com",
                    TextInputKind::Number => "0",
                    TextInputKind::Text | TextInputKind::Multiline => "",
                };
                if *input == TextInputKind::Multiline && value.contains('\n') {
                    return value
                        .lines()
                        .map(|line| Self::indent(vec![Span::styled(format!("\u{2502} {line}"), self.base)]))
                        .collect();
                }
                vec![Self::indent(vec![
                    Span::styled("[ ", self.base),
                    self.placeholder_or(value, placeholder.as_deref(), fallback),
                    Span::styled(" ]", self.base),
                ])]
            }
            Control::DateInput {
                value,
                placeholder,
                display,
            } => {
                let mut spans = vec![
                    Span::styled("\u{1F4C5} ", self.base),
                    self.placeholder_or(value, placeholder.as_deref(), "YYYY-MM-DD"),
                ];
                if let Some(display) = display {
                    spans.push(Span::styled(format!("  ({display})"), self.theme.text_muted_style()));
                }
                vec![Self::indent(spans)]
            }
            Control::SingleChoice { style, choices, selected } => match style {
                ChoiceStyle::Dropdown => {
                    let current = selected.and_then(|index| choices.get(index)).map(String::as_str).unwrap_or("");
                    let mut spans = vec![
                        Span::styled("\u{25BE} ", self.base),
                        self.placeholder_or(current, None, "Choose\u{2026}"),
                    ];
                    if choices.is_empty() {
                        spans.push(Span::styled("  (no options)", self.theme.status_warning()));
                    } else {
                        spans.push(Span::styled(format!("  {} options", choices.len()), self.theme.text_muted_style()));
                    }
                    vec![Self::indent(spans)]
                }
                ChoiceStyle::Radio => {
                    if choices.is_empty() {
                        return vec![Self::indent(vec![Span::styled("(no options)", self.theme.status_warning())])];
                    }
                    choices
                        .iter()
                        .enumerate()
                        .map(|(index, choice)| {
                            let glyph = create_radio(*selected == Some(index));
                            Self::indent(vec![Span::styled(format!("{glyph} {choice}"), self.item_style(index))])
                        })
                        .collect()
                }
            },
            Control::Switch { style, on } => {
                let text = match style {
                    SwitchStyle::Checkbox => create_checkbox(*on).to_string(),
                    SwitchStyle::Toggle if *on => "\u{25CF}\u{2501} on".to_string(),
                    SwitchStyle::Toggle => "\u{2501}\u{25CB} off".to_string(),
                };
                vec![Self::indent(vec![Span::styled(text, self.base)])]
            }
            Control::CheckboxGroup { items } | Control::MultiChoice { items } => self.choice_items(items),
            Control::Button { .. } => vec![Self::indent(vec![Span::styled(
                "< press >",
                self.base.add_modifier(Modifier::BOLD),
            )])],
            Control::ButtonGroup { slots } => vec![Self::indent(self.slot_spans(slots))],
            Control::DateRange { start, end } => vec![Self::indent(vec![
                Span::styled("\u{1F4C5} ", self.base),
                self.styled_part(start, 0),
                Span::styled(" \u{2192} ", self.base),
                self.styled_part(end, 1),
            ])],
            Control::Address { formatted, lat, lng } => {
                let mut spans = vec![
                    Span::styled("\u{2302} ", self.base),
                    self.placeholder_or(formatted.as_deref().unwrap_or(""), None, "No address"),
                ];
                if let (Some(lat), Some(lng)) = (lat, lng) {
                    spans.push(Span::styled(format!("  ({lat:.4}, {lng:.4})"), self.theme.text_muted_style()));
                }
                vec![Self::indent(spans)]
            }
            Control::ImageUpload { images } => {
                if images.is_empty() {
                    return vec![Self::indent(vec![self.placeholder_or("", None, "No images")])];
                }
                images
                    .iter()
                    .enumerate()
                    .map(|(index, image)| {
                        let mut spans = vec![Span::styled(format!("\u{25A3} {}", image.location()), self.item_style(index))];
                        if image.is_pending() {
                            spans.push(Span::styled("  pending upload", self.theme.status_warning()));
                        }
                        Self::indent(spans)
                    })
                    .collect()
            }
        }
    }

    fn choice_items(&self, items: &[ChoiceItem]) -> Vec<Line<'static>> {
        if items.is_empty() {
            return vec![Self::indent(vec![Span::styled("(no options)", self.theme.status_warning())])];
        }
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Self::indent(vec![Span::styled(
                    format!("{} {}", create_checkbox(item.checked), item.label),
                    self.item_style(index),
                )])
            })
            .collect()
    }

    fn slot_spans(&self, slots: &[SlotView]) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for slot in slots {
            let text = if slot.text.is_empty() { "\u{2026}".to_string() } else { slot.text.clone() };
            spans.push(Span::styled(format!("[ {text} ]"), self.item_style(slot.index)));
            if slot.removable {
                spans.push(Span::styled("\u{00D7}", self.theme.text_muted_style()));
            }
            spans.push(Span::raw(" "));
        }
        spans
    }

    fn styled_part(&self, value: &str, index: usize) -> Span<'static> {
        let text = if value.is_empty() { "YYYY-MM-DD" } else { value };
        Span::styled(text.to_string(), self.item_style(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::NordTheme;
    use formwright_engine::RenderMode;
    use formwright_types::{FieldId, FieldKind, FormField};

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn radio_lists_every_choice() {
        let mut field = FormField::new(FieldId::from("size"), FieldKind::Radio);
        field.options = vec!["S".into(), "M".into()];
        field.required = true;
        let view = formwright_engine::render(&field, None, RenderMode::Interactive).expect("renders");
        let lines = text_of(&field_lines(&view, &NordTheme::default(), FieldDrawOptions::default()));
        assert_eq!(lines[0], "  Radio group *  radio");
        assert_eq!(lines[1].trim(), "( ) S");
        assert_eq!(lines[2].trim(), "( ) M");
    }

    #[test]
    fn button_group_marks_removable_slots() {
        let field = FormField::new(FieldId::from("slots"), FieldKind::ButtonGroup);
        let view = formwright_engine::render(&field, None, RenderMode::Interactive).expect("renders");
        let lines = text_of(&field_lines(&view, &NordTheme::default(), FieldDrawOptions::default()));
        assert!(!lines[1].contains('\u{00D7}'));
    }
}
