//! Strict conversion between [`FormDefinition`] and its exported JSON document.
//!
//! Export shape:
//!
//! ```json
//! { "schemaVersion": 1, "title": "...", "description": "...",
//!   "fields": [ { "id": "field_1", "kind": "text", "label": "Text", "placeholder": null,
//!                 "required": false, "options": [], "metadata": {} } ] }
//! ```
//!
//! Reading is all-or-nothing: the first problem found aborts with a
//! [`DefinitionError`] naming the offending key path, such as `fields[2].id`.
//! Writing refuses any definition the reader would reject, with the same key paths.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use tracing::{info, warn};

use formwright_types::{CURRENT_SCHEMA_VERSION, FieldId, FieldKind, FormDefinition, FormField, strings_from_json};

/// Error returned when a document cannot be read as a form definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("invalid form definition: {problem}")]
    InvalidDefinition { problem: DefinitionProblem },
}

impl DefinitionError {
    pub fn problem(&self) -> &DefinitionProblem {
        match self {
            DefinitionError::InvalidDefinition { problem } => problem,
        }
    }

    /// Key path of the offending value, when the problem is tied to one.
    pub fn key(&self) -> Option<&str> {
        self.problem().key()
    }
}

impl From<DefinitionProblem> for DefinitionError {
    fn from(problem: DefinitionProblem) -> Self {
        DefinitionError::InvalidDefinition { problem }
    }
}

/// What exactly is wrong with a rejected document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionProblem {
    #[error("document is not valid {format}: {message}")]
    Syntax { format: &'static str, message: String },
    #[error("{} must be an object", display_key(key))]
    NotAnObject { key: String },
    #[error("missing required key `{key}`")]
    MissingKey { key: String },
    #[error("`{key}` is malformed: expected {expected}")]
    MalformedKey { key: String, expected: &'static str },
    #[error("`{key}` repeats field id '{id}'")]
    DuplicateFieldId { key: String, id: String },
    #[error("schema version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },
}

impl DefinitionProblem {
    pub fn key(&self) -> Option<&str> {
        match self {
            DefinitionProblem::Syntax { .. } => None,
            DefinitionProblem::NotAnObject { key } if key.is_empty() => None,
            DefinitionProblem::NotAnObject { key }
            | DefinitionProblem::MissingKey { key }
            | DefinitionProblem::MalformedKey { key, .. }
            | DefinitionProblem::DuplicateFieldId { key, .. } => Some(key.as_str()),
            DefinitionProblem::UnsupportedVersion { .. } => Some(SCHEMA_VERSION_KEY),
        }
    }
}

fn display_key(key: &str) -> String {
    if key.is_empty() { "the document".to_string() } else { format!("`{key}`") }
}

const SCHEMA_VERSION_KEY: &str = "schemaVersion";

// =====================
// Export
// =====================

/// Converts a definition into its JSON document.
///
/// Fails when the document could not be read back: an empty id or kind, a repeated id,
/// or a schema version outside `1..=CURRENT_SCHEMA_VERSION`.
pub fn serialize(form: &FormDefinition) -> Result<JsonValue, DefinitionError> {
    read_version(&JsonValue::from(form.schema_version))?;
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(form.fields.len());
    for (index, field) in form.fields.iter().enumerate() {
        let path = format!("fields[{index}]");
        if field.id.as_str().is_empty() {
            return Err(malformed(&path, "id", "a non-empty string").into());
        }
        if field.kind.as_str().is_empty() {
            return Err(malformed(&path, "kind", "a kind name").into());
        }
        if !seen.insert(&field.id) {
            return Err(DefinitionProblem::DuplicateFieldId {
                key: format!("{path}.id"),
                id: field.id.to_string(),
            }
            .into());
        }
        fields.push(serialize_field(field));
    }

    let mut root = Map::new();
    root.insert(SCHEMA_VERSION_KEY.into(), JsonValue::from(form.schema_version));
    root.insert("title".into(), JsonValue::from(form.title.clone()));
    root.insert("description".into(), JsonValue::from(form.description.clone()));
    root.insert("fields".into(), JsonValue::Array(fields));
    Ok(JsonValue::Object(root))
}

fn serialize_field(field: &FormField) -> JsonValue {
    let mut object = Map::new();
    object.insert("id".into(), JsonValue::from(field.id.as_str()));
    object.insert("kind".into(), JsonValue::from(field.kind.as_str()));
    object.insert("label".into(), JsonValue::from(field.label.clone()));
    object.insert("placeholder".into(), field.placeholder.clone().map_or(JsonValue::Null, JsonValue::from));
    object.insert("required".into(), JsonValue::Bool(field.required));
    object.insert("options".into(), JsonValue::from(field.options.clone()));
    let metadata = field.metadata.iter().map(|(key, value)| (key.clone(), value.clone())).collect::<Map<_, _>>();
    object.insert("metadata".into(), JsonValue::Object(metadata));
    JsonValue::Object(object)
}

/// Pretty-printed JSON text of a definition.
pub fn to_json_string(form: &FormDefinition) -> Result<String, DefinitionError> {
    Ok(format!("{:#}", serialize(form)?))
}

/// Writes the pretty JSON document to `path`, creating parent directories.
pub fn export_to_path(form: &FormDefinition, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut text = to_json_string(form).context("Refusing to export an invalid form definition")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    text.push('\n');
    fs::write(path, text).with_context(|| format!("Failed to write form definition: {}", path.display()))?;
    info!(path = %path.display(), fields = form.fields.len(), "exported form definition");
    Ok(())
}

// =====================
// Import
// =====================

/// Reads a definition from JSON text.
pub fn from_json_str(text: &str) -> Result<FormDefinition, DefinitionError> {
    let document: JsonValue = serde_json::from_str(text).map_err(|error| DefinitionProblem::Syntax {
        format: "JSON",
        message: error.to_string(),
    })?;
    deserialize(&document)
}

/// Reads a definition from YAML text, with the same validation as JSON.
pub fn from_yaml_str(text: &str) -> Result<FormDefinition, DefinitionError> {
    let document: JsonValue = serde_yaml::from_str(text).map_err(|error| DefinitionProblem::Syntax {
        format: "YAML",
        message: error.to_string(),
    })?;
    deserialize(&document)
}

/// Reads a definition file. `.yaml` and `.yml` files are parsed as YAML, anything else as JSON.
pub fn import_from_path(path: impl AsRef<Path>) -> Result<FormDefinition> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read form definition: {}", path.display()))?;
    let parsed = if is_yaml_path(path) { from_yaml_str(&text) } else { from_json_str(&text) };
    let form = parsed.with_context(|| format!("Failed to load form definition: {}", path.display()))?;
    info!(path = %path.display(), fields = form.fields.len(), "imported form definition");
    Ok(form)
}

pub(crate) fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("yaml") || extension.eq_ignore_ascii_case("yml"))
}

/// Rebuilds a definition from a parsed document.
pub fn deserialize(document: &JsonValue) -> Result<FormDefinition, DefinitionError> {
    let root = document.as_object().ok_or_else(|| DefinitionProblem::NotAnObject { key: String::new() })?;

    let schema_version = match root.get(SCHEMA_VERSION_KEY) {
        None | Some(JsonValue::Null) => CURRENT_SCHEMA_VERSION,
        Some(raw) => read_version(raw)?,
    };
    let title = required_string(root, "title", "title")?;
    let description = required_string(root, "description", "description")?;
    let raw_fields = root
        .get("fields")
        .ok_or_else(|| DefinitionProblem::MissingKey { key: "fields".into() })?
        .as_array()
        .ok_or_else(|| DefinitionProblem::MalformedKey {
            key: "fields".into(),
            expected: "an array of fields",
        })?;

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(raw_fields.len());
    for (index, raw) in raw_fields.iter().enumerate() {
        let path = format!("fields[{index}]");
        let field = read_field(raw, &path)?;
        if !seen.insert(field.id.clone()) {
            return Err(DefinitionProblem::DuplicateFieldId {
                key: format!("{path}.id"),
                id: field.id.to_string(),
            }
            .into());
        }
        if !field.kind.is_known() {
            warn!(field_id = %field.id, kind = %field.kind, "definition uses an unknown field kind");
        }
        fields.push(field);
    }

    Ok(FormDefinition {
        schema_version,
        title,
        description,
        fields,
    })
}

fn read_version(raw: &JsonValue) -> Result<u32, DefinitionProblem> {
    let found = raw.as_u64().filter(|version| *version > 0).ok_or_else(|| DefinitionProblem::MalformedKey {
        key: SCHEMA_VERSION_KEY.into(),
        expected: "a positive integer",
    })?;
    match u32::try_from(found) {
        Ok(version) if version <= CURRENT_SCHEMA_VERSION => Ok(version),
        _ => Err(DefinitionProblem::UnsupportedVersion {
            found,
            supported: CURRENT_SCHEMA_VERSION,
        }),
    }
}

fn required_string(object: &Map<String, JsonValue>, name: &str, path: &str) -> Result<String, DefinitionProblem> {
    match object.get(name) {
        None => Err(DefinitionProblem::MissingKey { key: path.to_string() }),
        Some(JsonValue::String(text)) => Ok(text.clone()),
        Some(_) => Err(DefinitionProblem::MalformedKey {
            key: path.to_string(),
            expected: "a string",
        }),
    }
}

fn read_field(raw: &JsonValue, path: &str) -> Result<FormField, DefinitionProblem> {
    let object = raw.as_object().ok_or_else(|| DefinitionProblem::NotAnObject { key: path.to_string() })?;

    let id = match object.get("id") {
        None => return Err(DefinitionProblem::MissingKey { key: format!("{path}.id") }),
        Some(JsonValue::String(text)) if !text.is_empty() => FieldId::new(text.clone()),
        Some(JsonValue::Number(number)) if number.is_i64() || number.is_u64() => FieldId::new(number.to_string()),
        Some(_) => {
            return Err(DefinitionProblem::MalformedKey {
                key: format!("{path}.id"),
                expected: "a non-empty string",
            });
        }
    };

    let (kind_key, raw_kind) = match (object.get("kind"), object.get("type")) {
        (Some(kind), _) => ("kind", kind),
        (None, Some(legacy)) => ("type", legacy),
        (None, None) => return Err(DefinitionProblem::MissingKey { key: format!("{path}.kind") }),
    };
    let kind = match raw_kind {
        JsonValue::String(text) if !text.is_empty() => FieldKind::from(text.as_str()),
        _ => {
            return Err(DefinitionProblem::MalformedKey {
                key: format!("{path}.{kind_key}"),
                expected: "a kind name",
            });
        }
    };

    let label = match object.get("label") {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(text)) => text.clone(),
        Some(_) => return Err(malformed(path, "label", "a string")),
    };
    let placeholder = match object.get("placeholder") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(text)) => Some(text.clone()),
        Some(_) => return Err(malformed(path, "placeholder", "a string or null")),
    };
    let required = match object.get("required") {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(flag)) => *flag,
        Some(_) => return Err(malformed(path, "required", "a boolean")),
    };
    // Non-string entries are dropped; the list itself must be an array.
    let options = match object.get("options") {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(raw @ JsonValue::Array(_)) => strings_from_json(raw),
        Some(_) => return Err(malformed(path, "options", "an array of strings")),
    };
    let metadata = match object.get("metadata") {
        None | Some(JsonValue::Null) => IndexMap::new(),
        Some(JsonValue::Object(entries)) => entries.iter().map(|(key, value)| (key.clone(), value.clone())).collect(),
        Some(_) => return Err(malformed(path, "metadata", "an object")),
    };

    Ok(FormField {
        id,
        kind,
        label,
        placeholder,
        required,
        options,
        metadata,
    })
}

fn malformed(path: &str, name: &str, expected: &'static str) -> DefinitionProblem {
    DefinitionProblem::MalformedKey {
        key: format!("{path}.{name}"),
        expected,
    }
}
