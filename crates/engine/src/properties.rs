//! Properties panel modelled as a form of its own.
//!
//! Each editable attribute of the selected field becomes a [`FormField`] of a small
//! property sheet. Edits go through the same interpreter as any other form and the
//! resulting value is folded back into a [`FieldPatch`] against the selected field.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::debug;

use formwright_types::{FieldId, FieldKind, FieldPatch, FieldValue, FormField, METADATA_OPTIONS_KEY, strings_from_json};

use crate::interpreter::{self, EditOutcome, FieldEdit, FieldView, RenderMode};
use crate::session::AuthoringSession;

/// Attribute of a field editable from the properties panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Label,
    Placeholder,
    Required,
    Options,
}

impl PropertyKey {
    pub const ALL: [PropertyKey; 4] = [PropertyKey::Label, PropertyKey::Placeholder, PropertyKey::Required, PropertyKey::Options];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKey::Label => "label",
            PropertyKey::Placeholder => "placeholder",
            PropertyKey::Required => "required",
            PropertyKey::Options => "options",
        }
    }

    pub fn from_id(id: &FieldId) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == id.as_str())
    }

    fn field_id(self) -> FieldId {
        FieldId::from(self.as_str())
    }

    /// Whether `kind` exposes this property.
    pub fn applies_to(self, kind: &FieldKind) -> bool {
        match self {
            PropertyKey::Label | PropertyKey::Required => kind.is_known(),
            PropertyKey::Placeholder => kind.is_text_shaped(),
            PropertyKey::Options => kind.is_choice_shaped() || *kind == FieldKind::Checkbox,
        }
    }

    fn schema(self) -> FormField {
        let (kind, label) = match self {
            PropertyKey::Label => (FieldKind::Text, "Label"),
            PropertyKey::Placeholder => (FieldKind::Text, "Placeholder"),
            PropertyKey::Required => (FieldKind::Toggle, "Required"),
            PropertyKey::Options => (FieldKind::ButtonGroup, "Options"),
        };
        let mut field = FormField::new(self.field_id(), kind);
        field.label = label.to_string();
        field
    }
}

/// Property form for one target field, with the target's current attribute values.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySheet {
    pub target: FieldId,
    pub fields: Vec<FormField>,
    pub values: IndexMap<FieldId, FieldValue>,
}

impl PropertySheet {
    /// Renders the sheet interactively.
    pub fn views(&self) -> Vec<FieldView> {
        interpreter::render_all(&self.fields, RenderMode::Interactive, |id| self.values.get(id))
    }

    pub fn keys(&self) -> Vec<PropertyKey> {
        self.fields.iter().filter_map(|field| PropertyKey::from_id(&field.id)).collect()
    }

    pub fn value(&self, key: PropertyKey) -> Option<&FieldValue> {
        self.values.get(&key.field_id())
    }

    fn field(&self, key: PropertyKey) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id.as_str() == key.as_str())
    }
}

/// Builds the property sheet for `field`.
pub fn property_sheet(field: &FormField) -> PropertySheet {
    let mut fields = Vec::new();
    let mut values = IndexMap::new();
    for key in PropertyKey::ALL {
        if !key.applies_to(&field.kind) {
            continue;
        }
        let value = match key {
            PropertyKey::Label => FieldValue::Text(field.label.clone()),
            PropertyKey::Placeholder => FieldValue::Text(field.placeholder.clone().unwrap_or_default()),
            PropertyKey::Required => FieldValue::Flag(field.required),
            PropertyKey::Options => FieldValue::List(option_slots(field)),
        };
        values.insert(key.field_id(), value);
        fields.push(key.schema());
    }
    PropertySheet {
        target: field.id.clone(),
        fields,
        values,
    }
}

/// Raw option labels shown as slots; always at least one slot.
fn option_slots(field: &FormField) -> Vec<String> {
    let raw = if field.kind == FieldKind::Checkbox {
        field.metadata.get(METADATA_OPTIONS_KEY).map(strings_from_json).unwrap_or_default()
    } else {
        field.options.clone()
    };
    if raw.is_empty() { vec![String::new()] } else { raw }
}

/// Applies `edit` to one property of the selected field.
///
/// Returns [`EditOutcome::Ignored`] when nothing is selected or the property does not
/// apply to the selected kind.
pub fn apply_property_edit(session: &mut AuthoringSession, key: PropertyKey, edit: FieldEdit) -> EditOutcome {
    let Some(target) = session.selected_field() else {
        return EditOutcome::Ignored;
    };
    let sheet = property_sheet(target);
    let Some(schema) = sheet.field(key) else {
        return EditOutcome::Ignored;
    };
    let outcome = interpreter::apply_edit(schema, sheet.value(key), RenderMode::Interactive, edit);
    if let EditOutcome::Changed(value) = &outcome {
        let patch = patch_for(target, key, value);
        let target_id = sheet.target.clone();
        debug!(field_id = %target_id, property = key.as_str(), "property edited");
        session.update_field(&target_id, patch);
    }
    outcome
}

fn patch_for(target: &FormField, key: PropertyKey, value: &FieldValue) -> FieldPatch {
    let patch = FieldPatch::default();
    match key {
        PropertyKey::Label => patch.label(value.as_text().unwrap_or_default()),
        PropertyKey::Placeholder => {
            let text = value.as_text().unwrap_or_default();
            patch.placeholder((!text.is_empty()).then(|| text.to_string()))
        }
        PropertyKey::Required => patch.required(value.as_flag().unwrap_or(false)),
        PropertyKey::Options => {
            let slots = value.as_list().unwrap_or_default();
            let all_blank = slots.iter().all(|slot| slot.trim().is_empty());
            if target.kind == FieldKind::Checkbox {
                if all_blank {
                    patch.remove_metadata(METADATA_OPTIONS_KEY)
                } else {
                    patch.set_metadata(METADATA_OPTIONS_KEY, JsonValue::from(slots.to_vec()))
                }
            } else if slots.len() == 1 && all_blank {
                patch.options(Vec::new())
            } else {
                patch.options(slots.to_vec())
            }
        }
    }
}

/// Sets a metadata key on the selected field. Returns whether anything changed.
pub fn set_metadata(session: &mut AuthoringSession, key: &str, value: JsonValue) -> bool {
    let Some(target) = session.selected_field_id().cloned() else {
        return false;
    };
    session.update_field(&target, FieldPatch::default().set_metadata(key, value))
}

/// Removes a metadata key from the selected field. Returns whether it was present.
pub fn remove_metadata(session: &mut AuthoringSession, key: &str) -> bool {
    let Some(target) = session.selected_field_id().cloned() else {
        return false;
    };
    session.update_field(&target, FieldPatch::default().remove_metadata(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn selected(kind: FieldKind) -> (AuthoringSession, FieldId) {
        let mut session = AuthoringSession::new();
        let id = session.add_field(kind);
        session.select_field(&id);
        (session, id)
    }

    #[test]
    fn sheet_lists_only_applicable_properties() {
        let text = FormField::new(FieldId::from("a"), FieldKind::Text);
        assert_eq!(
            property_sheet(&text).keys(),
            vec![PropertyKey::Label, PropertyKey::Placeholder, PropertyKey::Required]
        );
        let radio = FormField::new(FieldId::from("b"), FieldKind::Radio);
        assert_eq!(property_sheet(&radio).keys(), vec![PropertyKey::Label, PropertyKey::Required, PropertyKey::Options]);
        let checkbox = FormField::new(FieldId::from("c"), FieldKind::Checkbox);
        assert!(property_sheet(&checkbox).keys().contains(&PropertyKey::Options));
        let unknown = FormField::new(FieldId::from("d"), FieldKind::from("rating"));
        assert!(property_sheet(&unknown).keys().is_empty());
    }

    #[test]
    fn label_edit_flows_into_the_session() {
        let (mut session, id) = selected(FieldKind::Email);
        let outcome = apply_property_edit(&mut session, PropertyKey::Label, FieldEdit::SetText("Work email".into()));
        assert!(outcome.changed_value().is_some());
        assert_eq!(session.field(&id).map(|field| field.label.as_str()), Some("Work email"));
    }

    #[test]
    fn blank_placeholder_is_cleared() {
        let (mut session, id) = selected(FieldKind::Text);
        apply_property_edit(&mut session, PropertyKey::Placeholder, FieldEdit::SetText("Jane".into()));
        assert_eq!(session.field(&id).and_then(|field| field.placeholder.clone()), Some("Jane".into()));
        apply_property_edit(&mut session, PropertyKey::Placeholder, FieldEdit::SetText(String::new()));
        assert_eq!(session.field(&id).and_then(|field| field.placeholder.clone()), None);
    }

    #[test]
    fn options_are_edited_as_slots() {
        let (mut session, id) = selected(FieldKind::Select);
        apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::SetSlot { index: 0, text: "Red".into() });
        apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::AddSlot);
        assert_eq!(session.field(&id).map(|field| field.options.clone()), Some(vec!["Red".to_string(), String::new()]));
        apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::SetSlot { index: 1, text: "Blue".into() });
        assert_eq!(session.field(&id).map(|field| field.choices()), Some(vec!["Red".to_string(), "Blue".to_string()]));

        let outcome = apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::RemoveSlot(0));
        assert!(outcome.changed_value().is_some());
        let outcome = apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::RemoveSlot(0));
        assert!(outcome.is_rejected());
    }

    #[test]
    fn checkbox_options_live_in_metadata() {
        let (mut session, id) = selected(FieldKind::Checkbox);
        apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::SetSlot { index: 0, text: "Wifi".into() });
        assert_eq!(session.field(&id).and_then(|field| field.metadata.get(METADATA_OPTIONS_KEY).cloned()), Some(json!(["Wifi"])));
        assert!(session.field(&id).is_some_and(|field| field.options.is_empty()));

        apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::SetSlot { index: 0, text: " ".into() });
        assert!(session.field(&id).is_some_and(|field| !field.metadata.contains_key(METADATA_OPTIONS_KEY)));
    }

    #[test]
    fn no_selection_is_a_no_op() {
        let mut session = AuthoringSession::new();
        session.add_field(FieldKind::Text);
        let outcome = apply_property_edit(&mut session, PropertyKey::Label, FieldEdit::SetText("x".into()));
        assert_eq!(outcome, EditOutcome::Ignored);
        assert!(!set_metadata(&mut session, "source", json!("crm")));
        assert_eq!(session.fields()[0].label, "Text");
    }

    #[test]
    fn metadata_keys_can_be_set_and_removed() {
        let (mut session, id) = selected(FieldKind::Number);
        assert!(set_metadata(&mut session, "unit", json!("kg")));
        assert_eq!(session.field(&id).and_then(|field| field.metadata.get("unit").cloned()), Some(json!("kg")));
        assert!(remove_metadata(&mut session, "unit"));
        assert!(!remove_metadata(&mut session, "unit"));
    }
}
