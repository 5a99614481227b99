//! Field interpreter: turns one field definition plus a value into a view model.
//!
//! The interpreter is a pure function of `(field, value, mode)`. It never performs I/O and
//! never owns state; surfaces (canvas, preview, collection instances, the CLI) draw the
//! returned [`FieldView`] however they like and feed user input back through
//! [`apply_edit`].

mod edit;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use formwright_types::{FieldId, FieldKind, FieldValue, FormField, ImageReference};

pub use edit::{AuthoringSignal, EditOutcome, EditRejection, FieldEdit, apply_edit, interpret};

/// How a field is being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Layout preview on the authoring canvas; controls are disabled.
    AuthoringDisabled,
    /// Live preview or real data collection.
    Interactive,
    /// Display of collected values.
    ReadOnly,
}

impl RenderMode {
    pub fn is_interactive(self) -> bool {
        matches!(self, RenderMode::Interactive)
    }
}

/// Renderable description of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub id: FieldId,
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    /// True unless the view was rendered in interactive mode.
    pub disabled: bool,
    pub control: Control,
}

/// Concrete control a field renders as.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "kebab-case")]
pub enum Control {
    TextInput {
        input: TextInputKind,
        value: String,
        placeholder: Option<String>,
    },
    DateInput {
        value: String,
        placeholder: Option<String>,
        /// Human-readable date, only filled in read-only mode for well-formed ISO dates.
        display: Option<String>,
    },
    SingleChoice {
        style: ChoiceStyle,
        choices: Vec<String>,
        /// Index into `choices`; `None` when the value is empty or no longer offered.
        selected: Option<usize>,
    },
    Switch {
        style: SwitchStyle,
        on: bool,
    },
    CheckboxGroup {
        items: Vec<ChoiceItem>,
    },
    MultiChoice {
        items: Vec<ChoiceItem>,
    },
    Button {
        event: FieldId,
    },
    ButtonGroup {
        slots: Vec<SlotView>,
    },
    DateRange {
        start: String,
        end: String,
    },
    Address {
        formatted: Option<String>,
        lat: Option<f64>,
        lng: Option<f64>,
    },
    ImageUpload {
        images: Vec<ImageReference>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextInputKind {
    Text,
    Email,
    Number,
    Multiline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChoiceStyle {
    Dropdown,
    Radio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwitchStyle {
    Checkbox,
    Toggle,
}

/// One labelled option with its checked state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceItem {
    pub label: String,
    pub checked: bool,
}

/// One slot of a button group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub index: usize,
    pub text: String,
    /// The remove affordance is only offered while more than one slot exists.
    pub removable: bool,
}

/// Normalizes `current` into the field's value type, falling back to the field default.
///
/// Values of the wrong shape (for example a string held by a toggle) are coerced the same
/// way externally supplied JSON is.
pub fn normalized_value(field: &FormField, current: Option<&FieldValue>) -> Option<FieldValue> {
    match current {
        Some(value) => field.coerce_value(&value.to_json()),
        None => field.default_value(),
    }
}

/// Renders `field` with `current` as its value.
///
/// Returns `None` for kinds this build does not know; callers skip them.
pub fn render(field: &FormField, current: Option<&FieldValue>, mode: RenderMode) -> Option<FieldView> {
    if !field.kind.is_known() {
        warn!(field_id = %field.id, kind = %field.kind, "skipping field with unknown kind");
        return None;
    }
    let value = normalized_value(field, current);
    let control = build_control(field, value, mode)?;
    Some(FieldView {
        id: field.id.clone(),
        kind: field.kind.clone(),
        label: field.label.clone(),
        required: field.required,
        disabled: !mode.is_interactive(),
        control,
    })
}

fn build_control(field: &FormField, value: Option<FieldValue>, mode: RenderMode) -> Option<Control> {
    let placeholder = field.placeholder.clone().filter(|text| !text.trim().is_empty());
    let control = match &field.kind {
        FieldKind::Text | FieldKind::Email | FieldKind::Number | FieldKind::Textarea => Control::TextInput {
            input: match field.kind {
                FieldKind::Email => TextInputKind::Email,
                FieldKind::Number => TextInputKind::Number,
                FieldKind::Textarea => TextInputKind::Multiline,
                _ => TextInputKind::Text,
            },
            value: text_of(value),
            placeholder,
        },
        FieldKind::Date => {
            let value = text_of(value);
            let display = match mode {
                RenderMode::ReadOnly => human_date(&value),
                _ => None,
            };
            Control::DateInput {
                value,
                placeholder,
                display,
            }
        }
        FieldKind::Select | FieldKind::Dropdown | FieldKind::Radio => {
            let choices = field.choices();
            let current = text_of(value);
            let selected = choices.iter().position(|choice| *choice == current);
            Control::SingleChoice {
                style: if field.kind == FieldKind::Radio {
                    ChoiceStyle::Radio
                } else {
                    ChoiceStyle::Dropdown
                },
                choices,
                selected,
            }
        }
        // One box per listed option; repeated labels share a single checked state.
        FieldKind::Checkbox => match value {
            Some(FieldValue::FlagSet(flags)) => Control::CheckboxGroup {
                items: field
                    .checkbox_options()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|label| {
                        let checked = flags.get(&label).copied().unwrap_or(false);
                        ChoiceItem { label, checked }
                    })
                    .collect(),
            },
            other => Control::Switch {
                style: SwitchStyle::Checkbox,
                on: other.and_then(|value| value.as_flag()).unwrap_or(false),
            },
        },
        FieldKind::Toggle => Control::Switch {
            style: SwitchStyle::Toggle,
            on: value.and_then(|value| value.as_flag()).unwrap_or(false),
        },
        FieldKind::Button => Control::Button { event: field.id.clone() },
        FieldKind::ButtonGroup => {
            let slots = list_of(value);
            let removable = slots.len() > 1;
            Control::ButtonGroup {
                slots: slots
                    .into_iter()
                    .enumerate()
                    .map(|(index, text)| SlotView { index, text, removable })
                    .collect(),
            }
        }
        FieldKind::MultiSelect => {
            let selected = list_of(value);
            Control::MultiChoice {
                items: field
                    .choices()
                    .into_iter()
                    .map(|label| {
                        let checked = selected.contains(&label);
                        ChoiceItem { label, checked }
                    })
                    .collect(),
            }
        }
        FieldKind::DateRange => {
            let range = match value {
                Some(FieldValue::DateRange(range)) => range,
                _ => Default::default(),
            };
            Control::DateRange {
                start: range.start_date,
                end: range.end_date,
            }
        }
        FieldKind::Address => match value {
            Some(FieldValue::Address(address)) => Control::Address {
                formatted: Some(address.formatted_address).filter(|text| !text.is_empty()),
                lat: address.lat,
                lng: address.lng,
            },
            _ => Control::Address {
                formatted: None,
                lat: None,
                lng: None,
            },
        },
        FieldKind::MultiImageUpload => Control::ImageUpload {
            images: match value {
                Some(FieldValue::Images(images)) => images,
                _ => Vec::new(),
            },
        },
        FieldKind::Unknown(_) => return None,
    };
    Some(control)
}

fn text_of(value: Option<FieldValue>) -> String {
    match value {
        Some(FieldValue::Text(text)) => text,
        _ => String::new(),
    }
}

fn list_of(value: Option<FieldValue>) -> Vec<String> {
    match value {
        Some(FieldValue::List(items)) => items,
        _ => Vec::new(),
    }
}

fn human_date(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%b %-d, %Y").to_string())
}

/// Renders every field of a form in order, skipping unknown kinds.
pub fn render_all<'v, F>(fields: &[FormField], mode: RenderMode, mut value_of: F) -> Vec<FieldView>
where
    F: FnMut(&FieldId) -> Option<&'v FieldValue>,
{
    fields
        .iter()
        .filter_map(|field| render(field, value_of(&field.id), mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_types::{DateRange, METADATA_OPTIONS_KEY};
    use serde_json::json;

    fn field(kind: FieldKind) -> FormField {
        FormField::new(FieldId::from("f"), kind)
    }

    #[test]
    fn select_offers_only_non_blank_options() {
        let mut select = field(FieldKind::Select);
        select.options = vec!["".into(), "  ".into(), "Red".into(), "Blue".into()];

        let view = render(&select, None, RenderMode::Interactive).expect("select renders");
        let Control::SingleChoice { choices, selected, style } = view.control else {
            panic!("expected a single choice control");
        };
        assert_eq!(choices, vec!["Red", "Blue"]);
        assert_eq!(selected, None);
        assert_eq!(style, ChoiceStyle::Dropdown);

        let again = render(&select, None, RenderMode::Interactive).expect("select renders");
        assert_eq!(again.control, Control::SingleChoice { choices, selected, style });
    }

    #[test]
    fn selected_choice_is_located_in_filtered_list() {
        let mut radio = field(FieldKind::Radio);
        radio.options = vec![" ".into(), "Yes".into(), "No".into()];
        let view = render(&radio, Some(&FieldValue::Text("No".into())), RenderMode::Interactive).expect("radio renders");
        assert!(matches!(view.control, Control::SingleChoice { selected: Some(1), style: ChoiceStyle::Radio, .. }));
    }

    #[test]
    fn unknown_kinds_render_nothing() {
        assert!(render(&field(FieldKind::from("rating")), None, RenderMode::Interactive).is_none());
    }

    #[test]
    fn authoring_mode_disables_controls() {
        let view = render(&field(FieldKind::Text), None, RenderMode::AuthoringDisabled).expect("text renders");
        assert!(view.disabled);
        let view = render(&field(FieldKind::Text), None, RenderMode::Interactive).expect("text renders");
        assert!(!view.disabled);
    }

    #[test]
    fn button_group_offers_removal_only_with_several_slots() {
        let group = field(FieldKind::ButtonGroup);
        let view = render(&group, None, RenderMode::Interactive).expect("group renders");
        let Control::ButtonGroup { slots } = view.control else {
            panic!("expected a button group");
        };
        assert_eq!(slots.len(), 1);
        assert!(!slots[0].removable);

        let value = FieldValue::List(vec!["Yes".into(), "No".into()]);
        let view = render(&group, Some(&value), RenderMode::Interactive).expect("group renders");
        let Control::ButtonGroup { slots } = view.control else {
            panic!("expected a button group");
        };
        assert!(slots.iter().all(|slot| slot.removable));
    }

    #[test]
    fn externally_empty_button_group_shows_one_slot() {
        let view = render(&field(FieldKind::ButtonGroup), Some(&FieldValue::List(Vec::new())), RenderMode::Interactive)
            .expect("group renders");
        assert!(matches!(view.control, Control::ButtonGroup { ref slots } if slots.len() == 1));
    }

    #[test]
    fn checkbox_with_metadata_options_renders_a_group() {
        let mut checkbox = field(FieldKind::Checkbox);
        checkbox.metadata.insert(METADATA_OPTIONS_KEY.into(), json!(["Wifi", "", "Parking"]));
        let view = render(&checkbox, None, RenderMode::Interactive).expect("checkbox renders");
        let Control::CheckboxGroup { items } = view.control else {
            panic!("expected a checkbox group");
        };
        assert_eq!(items.iter().map(|item| item.label.as_str()).collect::<Vec<_>>(), vec!["Wifi", "Parking"]);
    }

    #[test]
    fn repeated_checkbox_options_render_every_box_with_a_shared_state() {
        let mut checkbox = field(FieldKind::Checkbox);
        checkbox.metadata.insert(METADATA_OPTIONS_KEY.into(), json!(["A", "A", "B"]));
        let outcome = apply_edit(
            &checkbox,
            None,
            RenderMode::Interactive,
            FieldEdit::SetOption {
                option: "A".into(),
                checked: true,
            },
        );
        let EditOutcome::Changed(value) = outcome else {
            panic!("expected a change");
        };
        let view = render(&checkbox, Some(&value), RenderMode::Interactive).expect("checkbox renders");
        let Control::CheckboxGroup { items } = view.control else {
            panic!("expected a checkbox group");
        };
        let rendered: Vec<(&str, bool)> = items.iter().map(|item| (item.label.as_str(), item.checked)).collect();
        assert_eq!(rendered, vec![("A", true), ("A", true), ("B", false)]);
    }

    #[test]
    fn read_only_dates_carry_a_readable_form() {
        let value = FieldValue::Text("2024-03-05".into());
        let view = render(&field(FieldKind::Date), Some(&value), RenderMode::ReadOnly).expect("date renders");
        assert!(matches!(view.control, Control::DateInput { display: Some(ref text), .. } if text == "Mar 5, 2024"));

        let view = render(&field(FieldKind::Date), Some(&value), RenderMode::Interactive).expect("date renders");
        assert!(matches!(view.control, Control::DateInput { display: None, .. }));
    }

    #[test]
    fn mismatched_values_fall_back_to_defaults() {
        let view = render(&field(FieldKind::DateRange), Some(&FieldValue::Flag(true)), RenderMode::Interactive).expect("range renders");
        let default_range = DateRange::default();
        assert_eq!(
            view.control,
            Control::DateRange {
                start: default_range.start_date,
                end: default_range.end_date,
            }
        );
    }

    #[test]
    fn views_serialize_with_control_tags() {
        let view = render(&field(FieldKind::Toggle), Some(&FieldValue::Flag(true)), RenderMode::Interactive).expect("toggle renders");
        let json = serde_json::to_value(&view).expect("view serializes");
        assert_eq!(json["control"]["control"], json!("switch"));
        assert_eq!(json["control"]["on"], json!(true));
        assert_eq!(json["kind"], json!("toggle"));
    }
}
