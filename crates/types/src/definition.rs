//! Aggregate root of a form: title, description and ordered field schemas.

use crate::field::{FieldId, FormField};
use crate::kind::FieldKind;

/// Version written into exported documents. Documents without a version are treated as `1`.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Declarative description of a form. The engine's serializer owns its document format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDefinition {
    pub schema_version: u32,
    pub title: String,
    pub description: String,
    /// Display order.
    pub fields: Vec<FormField>,
}

impl Default for FormDefinition {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            title: String::new(),
            description: String::new(),
            fields: Vec::new(),
        }
    }
}

impl FormDefinition {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn field(&self, id: &FieldId) -> Option<&FormField> {
        self.fields.iter().find(|field| &field.id == id)
    }

    pub fn field_mut(&mut self, id: &FieldId) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|field| &field.id == id)
    }

    pub fn position(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|field| &field.id == id)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.position(id).is_some()
    }

    /// Lists advisory problems that make the form incomplete without invalidating it.
    pub fn completeness_issues(&self) -> Vec<CompletenessIssue> {
        let mut issues = Vec::new();
        for field in &self.fields {
            if field.kind.is_choice_shaped() && field.choices().is_empty() {
                issues.push(CompletenessIssue::MissingOptions {
                    field_id: field.id.clone(),
                    kind: field.kind.clone(),
                });
            }
            if let Some(options) = field.checkbox_options()
                && options.is_empty()
            {
                issues.push(CompletenessIssue::MissingOptions {
                    field_id: field.id.clone(),
                    kind: field.kind.clone(),
                });
            }
            if !field.kind.is_known() {
                issues.push(CompletenessIssue::UnknownKind {
                    field_id: field.id.clone(),
                    kind: field.kind.clone(),
                });
            }
        }
        issues
    }
}

/// Advisory finding reported by [`FormDefinition::completeness_issues`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletenessIssue {
    /// A choice-shaped field has no selectable options after filtering.
    MissingOptions { field_id: FieldId, kind: FieldKind },
    /// The field's kind is not understood by this build and will not render.
    UnknownKind { field_id: FieldId, kind: FieldKind },
}

impl std::fmt::Display for CompletenessIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletenessIssue::MissingOptions { field_id, kind } => {
                write!(f, "field '{field_id}' ({kind}) has no options to choose from")
            }
            CompletenessIssue::UnknownKind { field_id, kind } => {
                write!(f, "field '{field_id}' uses unknown kind '{kind}' and will not render")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::METADATA_OPTIONS_KEY;
    use serde_json::json;

    #[test]
    fn completeness_flags_choice_fields_without_real_options() {
        let mut form = FormDefinition::new("Intake", "");
        let mut select = FormField::new(FieldId::from("a"), FieldKind::Select);
        select.options = vec!["".into(), "   ".into()];
        let mut radio = FormField::new(FieldId::from("b"), FieldKind::Radio);
        radio.options = vec!["Yes".into()];
        let mut checkbox = FormField::new(FieldId::from("c"), FieldKind::Checkbox);
        checkbox.metadata.insert(METADATA_OPTIONS_KEY.into(), json!([]));
        let plain_checkbox = FormField::new(FieldId::from("d"), FieldKind::Checkbox);
        let odd = FormField::new(FieldId::from("e"), FieldKind::from("rating"));
        form.fields = vec![select, radio, checkbox, plain_checkbox, odd];

        let issues = form.completeness_issues();
        let flagged: Vec<&str> = issues
            .iter()
            .map(|issue| match issue {
                CompletenessIssue::MissingOptions { field_id, .. } | CompletenessIssue::UnknownKind { field_id, .. } => field_id.as_str(),
            })
            .collect();
        assert_eq!(flagged, vec!["a", "c", "e"]);
    }

    #[test]
    fn lookups_find_fields_by_id() {
        let mut form = FormDefinition::default();
        form.fields.push(FormField::new(FieldId::from("x"), FieldKind::Text));
        assert_eq!(form.position(&FieldId::from("x")), Some(0));
        assert!(form.field(&FieldId::from("missing")).is_none());
        assert_eq!(form.schema_version, CURRENT_SCHEMA_VERSION);
    }
}
