//! Normalizing user input back into a field's value type.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use formwright_types::{AddressValue, DateRange, FieldId, FieldKind, FieldValue, FormField, ImageReference, ValueShape};

use super::{RenderMode, normalized_value};

/// A single user gesture against a rendered field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    /// Replace the text of a text-shaped or date field.
    SetText(String),
    /// Pick one of the filtered options of a select, dropdown or radio field.
    Choose(String),
    /// Reset a single-choice field to no selection.
    ClearChoice,
    /// Set a plain checkbox or toggle.
    SetFlag(bool),
    /// Check or uncheck one option of a checkbox group.
    SetOption { option: String, checked: bool },
    /// Add or remove an option from a multi-select value.
    ToggleChoice(String),
    AddSlot,
    RemoveSlot(usize),
    SetSlot { index: usize, text: String },
    SetRangeStart(String),
    SetRangeEnd(String),
    SetAddress(AddressValue),
    ClearAddress,
    AddImages(Vec<ImageReference>),
    RemoveImage(usize),
    ReplaceImages(Vec<ImageReference>),
    /// Activate a button field.
    Press,
}

impl FieldEdit {
    fn name(&self) -> &'static str {
        match self {
            FieldEdit::SetText(_) => "set-text",
            FieldEdit::Choose(_) => "choose",
            FieldEdit::ClearChoice => "clear-choice",
            FieldEdit::SetFlag(_) => "set-flag",
            FieldEdit::SetOption { .. } => "set-option",
            FieldEdit::ToggleChoice(_) => "toggle-choice",
            FieldEdit::AddSlot => "add-slot",
            FieldEdit::RemoveSlot(_) => "remove-slot",
            FieldEdit::SetSlot { .. } => "set-slot",
            FieldEdit::SetRangeStart(_) => "set-range-start",
            FieldEdit::SetRangeEnd(_) => "set-range-end",
            FieldEdit::SetAddress(_) => "set-address",
            FieldEdit::ClearAddress => "clear-address",
            FieldEdit::AddImages(_) => "add-images",
            FieldEdit::RemoveImage(_) => "remove-image",
            FieldEdit::ReplaceImages(_) => "replace-images",
            FieldEdit::Press => "press",
        }
    }
}

/// Side effect a disabled canvas control requests from the authoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthoringSignal {
    /// Show or hide the properties panel.
    ToggleProperties,
}

/// Why an edit was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditRejection {
    #[error("'{0}' is not one of the field's options")]
    NotAnOption(String),
    #[error("the last remaining slot cannot be removed")]
    LastSlot,
    #[error("there is no slot at index {0}")]
    SlotOutOfRange(usize),
    #[error("there is no image at index {0}")]
    ImageOutOfRange(usize),
    #[error("{edit} does not apply to {kind} fields")]
    Mismatch { edit: &'static str, kind: FieldKind },
}

/// Result of feeding an edit through the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The field's next value.
    Changed(FieldValue),
    /// A button fired; the event carries the field id, nothing is stored.
    Fired(FieldId),
    /// A disabled canvas control asked the authoring session for a side effect.
    Authoring(AuthoringSignal),
    /// The edit was understood but refused.
    Rejected(EditRejection),
    /// The edit has no effect in the current mode.
    Ignored,
}

impl EditOutcome {
    pub fn changed_value(&self) -> Option<&FieldValue> {
        match self {
            EditOutcome::Changed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, EditOutcome::Rejected(_))
    }

    /// Hands a new value to `on_change` or a fired button id to `on_event`.
    pub fn emit<C, E>(&self, on_change: C, on_event: E)
    where
        C: FnOnce(&FieldValue),
        E: FnOnce(&FieldId),
    {
        match self {
            EditOutcome::Changed(value) => on_change(value),
            EditOutcome::Fired(id) => on_event(id),
            EditOutcome::Authoring(_) | EditOutcome::Rejected(_) | EditOutcome::Ignored => {}
        }
    }
}

/// `onChange`-style entry point: applies `edit` and hands any new value to `on_change`.
pub fn interpret<F>(field: &FormField, current: Option<&FieldValue>, mode: RenderMode, edit: FieldEdit, on_change: F) -> EditOutcome
where
    F: FnOnce(FieldValue),
{
    let outcome = apply_edit(field, current, mode, edit);
    outcome.emit(|value| on_change(value.clone()), |_| {});
    outcome
}

/// Applies `edit` to `current`, returning the normalized next value or the reason it was refused.
pub fn apply_edit(field: &FormField, current: Option<&FieldValue>, mode: RenderMode, edit: FieldEdit) -> EditOutcome {
    match mode {
        RenderMode::ReadOnly => EditOutcome::Ignored,
        RenderMode::AuthoringDisabled => authoring_edit(field, &edit),
        RenderMode::Interactive => {
            let outcome = interactive_edit(field, current, edit);
            if let EditOutcome::Rejected(reason) = &outcome {
                debug!(field_id = %field.id, %reason, "edit rejected");
            }
            outcome
        }
    }
}

fn authoring_edit(field: &FormField, edit: &FieldEdit) -> EditOutcome {
    match (&field.kind, edit) {
        (FieldKind::Checkbox, FieldEdit::SetFlag(_) | FieldEdit::SetOption { .. }) => {
            EditOutcome::Authoring(AuthoringSignal::ToggleProperties)
        }
        _ => EditOutcome::Ignored,
    }
}

fn interactive_edit(field: &FormField, current: Option<&FieldValue>, edit: FieldEdit) -> EditOutcome {
    if field.kind == FieldKind::Button {
        return match edit {
            FieldEdit::Press => EditOutcome::Fired(field.id.clone()),
            other => mismatch(field, &other),
        };
    }
    let Some(value) = normalized_value(field, current) else {
        return EditOutcome::Ignored;
    };

    match (field.kind.shape(), value, edit) {
        (ValueShape::Text | ValueShape::IsoDate, _, FieldEdit::SetText(text)) => EditOutcome::Changed(FieldValue::Text(text)),

        (ValueShape::SingleChoice, _, FieldEdit::Choose(choice)) => {
            if field.choices().contains(&choice) {
                EditOutcome::Changed(FieldValue::Text(choice))
            } else {
                EditOutcome::Rejected(EditRejection::NotAnOption(choice))
            }
        }
        (ValueShape::SingleChoice, _, FieldEdit::ClearChoice) => EditOutcome::Changed(FieldValue::Text(String::new())),

        (ValueShape::Flag, FieldValue::Flag(_), FieldEdit::SetFlag(flag)) => EditOutcome::Changed(FieldValue::Flag(flag)),
        (ValueShape::Flag, FieldValue::FlagSet(flags), FieldEdit::SetOption { option, checked }) => set_option(flags, option, checked),

        (ValueShape::MultiChoice, FieldValue::List(selected), FieldEdit::ToggleChoice(choice)) => {
            toggle_choice(field, selected, choice)
        }

        (ValueShape::TextSlots, FieldValue::List(slots), edit @ (FieldEdit::AddSlot | FieldEdit::RemoveSlot(_) | FieldEdit::SetSlot { .. })) => {
            edit_slots(slots, edit)
        }

        (ValueShape::DateRange, FieldValue::DateRange(range), FieldEdit::SetRangeStart(start)) => {
            EditOutcome::Changed(FieldValue::DateRange(DateRange { start_date: start, ..range }))
        }
        (ValueShape::DateRange, FieldValue::DateRange(range), FieldEdit::SetRangeEnd(end)) => {
            EditOutcome::Changed(FieldValue::DateRange(DateRange { end_date: end, ..range }))
        }

        (ValueShape::Address, _, FieldEdit::SetAddress(address)) => EditOutcome::Changed(FieldValue::Address(address)),
        (ValueShape::Address, _, FieldEdit::ClearAddress) => EditOutcome::Changed(FieldValue::Unset),

        (ValueShape::ImageList, FieldValue::Images(mut images), FieldEdit::AddImages(added)) => {
            images.extend(added);
            EditOutcome::Changed(FieldValue::Images(images))
        }
        (ValueShape::ImageList, FieldValue::Images(mut images), FieldEdit::RemoveImage(index)) => {
            if index >= images.len() {
                return EditOutcome::Rejected(EditRejection::ImageOutOfRange(index));
            }
            images.remove(index);
            EditOutcome::Changed(FieldValue::Images(images))
        }
        (ValueShape::ImageList, _, FieldEdit::ReplaceImages(images)) => EditOutcome::Changed(FieldValue::Images(images)),

        (_, _, edit) => mismatch(field, &edit),
    }
}

fn mismatch(field: &FormField, edit: &FieldEdit) -> EditOutcome {
    EditOutcome::Rejected(EditRejection::Mismatch {
        edit: edit.name(),
        kind: field.kind.clone(),
    })
}

fn set_option(mut flags: IndexMap<String, bool>, option: String, checked: bool) -> EditOutcome {
    match flags.get_mut(&option) {
        Some(slot) => {
            *slot = checked;
            EditOutcome::Changed(FieldValue::FlagSet(flags))
        }
        None => EditOutcome::Rejected(EditRejection::NotAnOption(option)),
    }
}

fn toggle_choice(field: &FormField, mut selected: Vec<String>, choice: String) -> EditOutcome {
    if let Some(position) = selected.iter().position(|item| *item == choice) {
        selected.remove(position);
        return EditOutcome::Changed(FieldValue::List(selected));
    }
    if !field.choices().contains(&choice) {
        return EditOutcome::Rejected(EditRejection::NotAnOption(choice));
    }
    selected.push(choice);
    EditOutcome::Changed(FieldValue::List(selected))
}

/// Button-group editing with a floor of one slot.
fn edit_slots(mut slots: Vec<String>, edit: FieldEdit) -> EditOutcome {
    match edit {
        FieldEdit::AddSlot => slots.push(String::new()),
        FieldEdit::RemoveSlot(index) => {
            if slots.len() <= 1 {
                return EditOutcome::Rejected(EditRejection::LastSlot);
            }
            if index >= slots.len() {
                return EditOutcome::Rejected(EditRejection::SlotOutOfRange(index));
            }
            slots.remove(index);
        }
        FieldEdit::SetSlot { index, text } => match slots.get_mut(index) {
            Some(slot) => *slot = text,
            None => return EditOutcome::Rejected(EditRejection::SlotOutOfRange(index)),
        },
        _ => {}
    }
    if slots.is_empty() {
        slots.push(String::new());
    }
    EditOutcome::Changed(FieldValue::List(slots))
}
