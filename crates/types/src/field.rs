//! Field schema nodes and the patches that mutate them.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::kind::{FieldKind, ValueShape};
use crate::options::{filter_options, strings_from_json};
use crate::value::{AddressValue, DateRange, FieldValue, flag_from_json, images_from_json, list_from_json, text_from_json};

/// Metadata key holding the option labels of a checkbox group.
pub const METADATA_OPTIONS_KEY: &str = "options";

/// Stable identifier of a field within one form.
///
/// Serialized as a string. Integer identifiers found in older documents are accepted and
/// converted to their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for FieldId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Ok(FieldId(text)),
            RawId::Integer(number) => Ok(FieldId(number.to_string())),
        }
    }
}

/// One schema node of a form definition.
///
/// Documents are read and written only through the engine's serializer, which owns the
/// wire format and its validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: FieldId,
    pub kind: FieldKind,
    pub label: String,
    /// Hint text; only text-shaped kinds display it.
    pub placeholder: Option<String>,
    /// Author-facing annotation. Enforcement belongs to whoever submits the values.
    pub required: bool,
    /// Raw option labels. Blank entries stay in storage and are filtered at render time.
    pub options: Vec<String>,
    /// Anything the common attributes do not cover, preserved verbatim.
    pub metadata: IndexMap<String, JsonValue>,
}

impl FormField {
    /// Creates a field with the defaults used when a kind is dropped onto the canvas.
    pub fn new(id: FieldId, kind: FieldKind) -> Self {
        let label = kind.label().to_string();
        Self {
            id,
            kind,
            label,
            placeholder: None,
            required: false,
            options: Vec::new(),
            metadata: IndexMap::new(),
        }
    }

    /// Options offered for selection, blank entries removed.
    pub fn choices(&self) -> Vec<String> {
        filter_options(&self.options)
    }

    /// Checkbox group labels from `metadata.options`, or `None` for a plain checkbox.
    pub fn checkbox_options(&self) -> Option<Vec<String>> {
        if self.kind != FieldKind::Checkbox {
            return None;
        }
        let raw = self.metadata.get(METADATA_OPTIONS_KEY)?;
        Some(filter_options(&strings_from_json(raw)))
    }

    /// Default value for this field, taking checkbox metadata into account.
    pub fn default_value(&self) -> Option<FieldValue> {
        if let Some(options) = self.checkbox_options() {
            return Some(FieldValue::FlagSet(options.into_iter().map(|option| (option, false)).collect()));
        }
        self.kind.default_value()
    }

    /// Reads an externally supplied JSON value into this field's value type.
    ///
    /// Mismatched or missing values fall back to the field default; valueless kinds
    /// always yield `None`.
    pub fn coerce_value(&self, raw: &JsonValue) -> Option<FieldValue> {
        let fallback = self.default_value()?;
        Some(self.read_value(raw).unwrap_or(fallback))
    }

    /// Strict form of [`coerce_value`](Self::coerce_value): `None` when `raw` does not fit
    /// the field. A single choice outside the options does not fit; unknown entries of a
    /// multi choice are dropped.
    pub fn read_value(&self, raw: &JsonValue) -> Option<FieldValue> {
        match self.kind.shape() {
            ValueShape::Text | ValueShape::IsoDate => text_from_json(raw).map(FieldValue::Text),
            ValueShape::SingleChoice => text_from_json(raw)
                .filter(|text| text.is_empty() || self.choices().contains(text))
                .map(FieldValue::Text),
            ValueShape::Flag => match self.checkbox_options() {
                Some(options) => Some(FieldValue::FlagSet(flag_set_from_json(&options, raw))),
                None => flag_from_json(raw).map(FieldValue::Flag),
            },
            ValueShape::TextSlots => list_from_json(raw).map(|slots| {
                if slots.is_empty() {
                    FieldValue::List(vec![String::new()])
                } else {
                    FieldValue::List(slots)
                }
            }),
            ValueShape::MultiChoice => list_from_json(raw).map(|picked| {
                let choices = self.choices();
                FieldValue::List(picked.into_iter().filter(|entry| choices.contains(entry)).collect())
            }),
            ValueShape::DateRange => match raw {
                JsonValue::Object(_) => serde_json::from_value::<DateRange>(raw.clone()).ok().map(FieldValue::DateRange),
                _ => None,
            },
            ValueShape::Address => match raw {
                JsonValue::Object(_) => serde_json::from_value::<AddressValue>(raw.clone()).ok().map(FieldValue::Address),
                JsonValue::String(text) if !text.trim().is_empty() => Some(FieldValue::Address(AddressValue {
                    formatted_address: text.clone(),
                    ..AddressValue::default()
                })),
                _ => None,
            },
            ValueShape::ImageList => images_from_json(raw).map(FieldValue::Images),
            ValueShape::Valueless => None,
        }
    }

    /// Whether `value` is one this field can hold. Choice-shaped fields only admit their
    /// own options, or the empty selection.
    pub fn admits(&self, value: &FieldValue) -> bool {
        match (self.kind.shape(), value) {
            (ValueShape::SingleChoice, FieldValue::Text(text)) => text.is_empty() || self.choices().contains(text),
            (ValueShape::MultiChoice, FieldValue::List(picked)) => {
                let choices = self.choices();
                picked.iter().all(|entry| choices.contains(entry))
            }
            _ => true,
        }
    }

    /// Merges `patch` into the field. Identity and kind are never touched.
    ///
    /// Returns `true` when any attribute changed.
    pub fn apply_patch(&mut self, patch: FieldPatch) -> bool {
        let mut changed = false;
        if let Some(label) = patch.label
            && label != self.label
        {
            self.label = label;
            changed = true;
        }
        if let Some(placeholder) = patch.placeholder
            && placeholder != self.placeholder
        {
            self.placeholder = placeholder;
            changed = true;
        }
        if let Some(required) = patch.required
            && required != self.required
        {
            self.required = required;
            changed = true;
        }
        if let Some(options) = patch.options
            && options != self.options
        {
            self.options = options;
            changed = true;
        }
        for (key, entry) in patch.metadata {
            match entry {
                Some(value) => {
                    if self.metadata.get(&key) != Some(&value) {
                        self.metadata.insert(key, value);
                        changed = true;
                    }
                }
                None => {
                    if self.metadata.shift_remove(&key).is_some() {
                        changed = true;
                    }
                }
            }
        }
        changed
    }
}

fn flag_set_from_json(options: &[String], raw: &JsonValue) -> IndexMap<String, bool> {
    match raw {
        JsonValue::Object(map) => options
            .iter()
            .map(|option| (option.clone(), map.get(option).and_then(flag_from_json).unwrap_or(false)))
            .collect(),
        JsonValue::Array(_) => {
            let checked = strings_from_json(raw);
            options.iter().map(|option| (option.clone(), checked.contains(option))).collect()
        }
        // A single shared boolean from documents written before per-option values existed.
        other => {
            let shared = flag_from_json(other).unwrap_or(false);
            options.iter().map(|option| (option.clone(), shared)).collect()
        }
    }
}

/// Partial update of a field's attributes.
///
/// `None` leaves an attribute untouched. Metadata entries set a key to a value, or remove
/// the key when the entry is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub placeholder: Option<Option<String>>,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
    pub metadata: IndexMap<String, Option<JsonValue>>,
}

impl FieldPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn set_metadata(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.metadata.insert(key.into(), Some(value));
        self
    }

    pub fn remove_metadata(mut self, key: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.placeholder.is_none()
            && self.required.is_none()
            && self.options.is_none()
            && self.metadata.is_empty()
    }
}
