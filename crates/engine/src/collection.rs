//! Data-collection mode: one filled-in instance of a form definition.

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use formwright_types::{FieldId, FieldValue, FormDefinition};

use crate::interpreter::{self, EditOutcome, FieldEdit, FieldView, RenderMode};

/// Values being collected for a definition.
///
/// The bag holds one entry per field that carries a value. Buttons and unknown kinds
/// never hold one; their presses are queued as events instead.
#[derive(Debug, Clone)]
pub struct CollectionInstance {
    definition: FormDefinition,
    values: IndexMap<FieldId, FieldValue>,
    events: Vec<FieldId>,
}

impl CollectionInstance {
    /// Seeds every field with its kind default.
    pub fn new(definition: FormDefinition) -> Self {
        let values = definition
            .fields
            .iter()
            .filter_map(|field| field.default_value().map(|value| (field.id.clone(), value)))
            .collect();
        Self {
            definition,
            values,
            events: Vec::new(),
        }
    }

    /// Seeds from an external `{ id: value }` object, coercing each entry to its field's type.
    ///
    /// Entries for unknown ids are dropped; missing entries take the default.
    pub fn with_values(definition: FormDefinition, values: &JsonValue) -> Self {
        let mut instance = Self::new(definition);
        let Some(entries) = values.as_object() else {
            warn!("ignoring seed values that are not an object");
            return instance;
        };
        for (raw_id, raw_value) in entries {
            let id = FieldId::from(raw_id.as_str());
            match instance.definition.field(&id).and_then(|field| field.coerce_value(raw_value)) {
                Some(value) => {
                    instance.values.insert(id, value);
                }
                None => debug!(field_id = %id, "dropping seed value without a matching field"),
            }
        }
        instance
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn value(&self, id: &FieldId) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Renders every known field in definition order.
    pub fn render(&self, mode: RenderMode) -> Vec<FieldView> {
        interpreter::render_all(&self.definition.fields, mode, |id| self.values.get(id))
    }

    /// Applies an interactive edit to one field. Unknown ids are ignored.
    pub fn apply_edit(&mut self, id: &FieldId, edit: FieldEdit) -> EditOutcome {
        let Some(field) = self.definition.field(id) else {
            return EditOutcome::Ignored;
        };
        let outcome = interpreter::apply_edit(field, self.values.get(id), RenderMode::Interactive, edit);
        match &outcome {
            EditOutcome::Changed(value) => {
                self.values.insert(id.clone(), value.clone());
            }
            EditOutcome::Fired(event) => self.events.push(event.clone()),
            _ => {}
        }
        outcome
    }

    /// Replaces a field's value, normalized to its type.
    ///
    /// Returns `false` for unknown or valueless fields, and for choices outside the field's options.
    pub fn set_value(&mut self, id: &FieldId, value: FieldValue) -> bool {
        let Some(field) = self.definition.field(id) else {
            debug!(field_id = %id, "ignoring value for a field that does not exist");
            return false;
        };
        if !field.admits(&value) {
            debug!(field_id = %id, "rejecting a value outside the field's options");
            return false;
        }
        match interpreter::normalized_value(field, Some(&value)) {
            Some(normalized) => {
                self.values.insert(id.clone(), normalized);
                true
            }
            None => false,
        }
    }

    /// The `{ id: value }` bag in definition order.
    pub fn to_json(&self) -> JsonValue {
        let bag = self
            .definition
            .fields
            .iter()
            .filter_map(|field| self.values.get(&field.id).map(|value| (field.id.to_string(), value.to_json())))
            .collect::<Map<_, _>>();
        JsonValue::Object(bag)
    }

    /// Drains button presses recorded since the last call.
    pub fn take_events(&mut self) -> Vec<FieldId> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_types::{FieldKind, FormField};
    use serde_json::json;

    fn definition() -> FormDefinition {
        let mut form = FormDefinition::new("Booking", "");
        form.fields.push(FormField::new(FieldId::from("name"), FieldKind::Text));
        form.fields.push(FormField::new(FieldId::from("stay"), FieldKind::DateRange));
        form.fields.push(FormField::new(FieldId::from("submit"), FieldKind::Button));
        form.fields.push(FormField::new(FieldId::from("mood"), FieldKind::from("emoji-scale")));
        form
    }

    fn choice_definition() -> FormDefinition {
        let mut form = FormDefinition::new("Membership", "");
        let mut tier = FormField::new(FieldId::from("tier"), FieldKind::Select);
        tier.options = vec!["Gold".into(), "".into(), "Silver".into()];
        let mut tags = FormField::new(FieldId::from("tags"), FieldKind::MultiSelect);
        tags.options = vec!["early".into(), "vip".into()];
        form.fields = vec![tier, tags];
        form
    }

    #[test]
    fn defaults_skip_buttons_and_unknown_kinds() {
        let instance = CollectionInstance::new(definition());
        assert_eq!(
            instance.to_json(),
            json!({"name": "", "stay": {"startDate": "", "endDate": ""}})
        );
        assert_eq!(instance.render(RenderMode::ReadOnly).len(), 3);
    }

    #[test]
    fn edits_are_last_write_wins_and_presses_are_events() {
        let mut instance = CollectionInstance::new(definition());
        instance.apply_edit(&FieldId::from("name"), FieldEdit::SetText("Ada".into()));
        instance.apply_edit(&FieldId::from("name"), FieldEdit::SetText("Grace".into()));
        instance.apply_edit(&FieldId::from("stay"), FieldEdit::SetRangeEnd("2024-03-09".into()));
        let outcome = instance.apply_edit(&FieldId::from("submit"), FieldEdit::Press);

        assert_eq!(outcome, EditOutcome::Fired(FieldId::from("submit")));
        assert_eq!(instance.to_json()["name"], json!("Grace"));
        assert_eq!(instance.to_json()["stay"], json!({"startDate": "", "endDate": "2024-03-09"}));
        assert!(instance.to_json().get("submit").is_none());
        assert_eq!(instance.take_events(), vec![FieldId::from("submit")]);
        assert!(instance.take_events().is_empty());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut instance = CollectionInstance::new(definition());
        assert_eq!(instance.apply_edit(&FieldId::from("ghost"), FieldEdit::SetText("x".into())), EditOutcome::Ignored);
        assert!(!instance.set_value(&FieldId::from("ghost"), FieldValue::Text("x".into())));
        assert!(!instance.set_value(&FieldId::from("submit"), FieldValue::Flag(true)));
    }

    #[test]
    fn seed_values_are_coerced() {
        let instance = CollectionInstance::with_values(definition(), &json!({"name": 7, "ghost": "boo", "stay": "bad"}));
        assert_eq!(instance.value(&FieldId::from("name")), Some(&FieldValue::Text("7".into())));
        assert_eq!(instance.to_json()["stay"], json!({"startDate": "", "endDate": ""}));
        assert!(instance.value(&FieldId::from("ghost")).is_none());
    }

    #[test]
    fn seeded_choices_outside_the_options_are_dropped() {
        let instance = CollectionInstance::with_values(choice_definition(), &json!({"tier": "Purple", "tags": ["zzz", " ", "vip"]}));
        assert_eq!(instance.value(&FieldId::from("tier")), Some(&FieldValue::Text(String::new())));
        assert_eq!(instance.value(&FieldId::from("tags")), Some(&FieldValue::List(vec!["vip".into()])));

        let instance = CollectionInstance::with_values(choice_definition(), &json!({"tier": "Silver"}));
        assert_eq!(instance.to_json()["tier"], json!("Silver"));
    }

    #[test]
    fn set_value_rejects_choices_outside_the_options() {
        let mut instance = CollectionInstance::new(choice_definition());
        let tier = FieldId::from("tier");
        let tags = FieldId::from("tags");

        assert!(!instance.set_value(&tier, FieldValue::Text("Purple".into())));
        assert_eq!(instance.value(&tier), Some(&FieldValue::Text(String::new())));
        assert!(!instance.set_value(&tags, FieldValue::List(vec!["vip".into(), "zzz".into()])));
        assert_eq!(instance.value(&tags), Some(&FieldValue::List(Vec::new())));

        assert!(instance.set_value(&tier, FieldValue::Text("Gold".into())));
        assert!(instance.set_value(&tags, FieldValue::List(vec!["vip".into()])));
        assert_eq!(instance.to_json(), json!({"tier": "Gold", "tags": ["vip"]}));
        assert!(instance.set_value(&tier, FieldValue::Text(String::new())));
    }
}
