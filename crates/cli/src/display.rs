//! Plain-text rendering of view models for `formwright show`.

use formwright_engine::{Control, FieldView};
use formwright_types::FormDefinition;

/// One line per field: `Label*: value`.
pub fn form_text(definition: &FormDefinition, views: &[FieldView]) -> String {
    let mut out = String::new();
    let title = if definition.title.is_empty() { "Untitled form" } else { definition.title.as_str() };
    out.push_str(title);
    out.push('\n');
    if !definition.description.is_empty() {
        out.push_str(&definition.description);
        out.push('\n');
    }
    out.push('\n');
    for view in views {
        let marker = if view.required { "*" } else { "" };
        out.push_str(&format!("{}{marker}: {}\n", view.label, control_text(&view.control)));
    }
    let hidden = definition.fields.len() - views.len();
    if hidden > 0 {
        out.push_str(&format!("\n({hidden} field(s) of unknown kind not shown)\n"));
    }
    out
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}

fn control_text(control: &Control) -> String {
    match control {
        Control::TextInput { value, .. } => or_dash(value).to_string(),
        Control::DateInput { value, display, .. } => display.clone().unwrap_or_else(|| or_dash(value).to_string()),
        Control::SingleChoice { choices, selected, .. } => {
            selected.and_then(|index| choices.get(index)).map_or_else(|| "-".to_string(), Clone::clone)
        }
        Control::Switch { on, .. } => (if *on { "yes" } else { "no" }).to_string(),
        Control::CheckboxGroup { items } | Control::MultiChoice { items } => {
            let checked: Vec<&str> = items.iter().filter(|item| item.checked).map(|item| item.label.as_str()).collect();
            if checked.is_empty() { "-".to_string() } else { checked.join(", ") }
        }
        Control::Button { .. } => "[button]".to_string(),
        Control::ButtonGroup { slots } => {
            let texts: Vec<&str> = slots.iter().map(|slot| slot.text.as_str()).filter(|text| !text.is_empty()).collect();
            if texts.is_empty() { "-".to_string() } else { texts.join(" | ") }
        }
        Control::DateRange { start, end } => format!("{} \u{2192} {}", or_dash(start), or_dash(end)),
        Control::Address { formatted, lat, lng } => match (formatted, lat, lng) {
            (Some(formatted), Some(lat), Some(lng)) => format!("{formatted} ({lat:.4}, {lng:.4})"),
            (Some(formatted), _, _) => formatted.clone(),
            _ => "-".to_string(),
        },
        Control::ImageUpload { images } => {
            if images.is_empty() {
                "-".to_string()
            } else {
                images.iter().map(|image| image.location()).collect::<Vec<_>>().join(", ")
            }
        }
    }
}
