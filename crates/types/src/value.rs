//! Runtime values held by fields while a form is previewed or filled in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::options::strings_from_json;

/// Value of one field. The variant in use depends on the field's kind.
///
/// Serialization is untagged so a value bag reads as plain JSON
/// (`"Red"`, `true`, `["a", "b"]`, `{"startDate": ..}`). Reading values back requires the
/// owning field; see [`FormField::coerce_value`](crate::FormField::coerce_value).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    /// One boolean per checkbox option, in option order.
    FlagSet(IndexMap<String, bool>),
    List(Vec<String>),
    DateRange(DateRange),
    Address(AddressValue),
    Images(Vec<ImageReference>),
    /// No value yet (address fields before a lookup resolves).
    Unset,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_date_range(&self) -> Option<&DateRange> {
        match self {
            FieldValue::DateRange(range) => Some(range),
            _ => None,
        }
    }

    /// Converts the value into its JSON form for submission payloads.
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// Composite value of a date-range field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, alias = "start_date")]
    pub start_date: String,
    #[serde(default, alias = "end_date")]
    pub end_date: String,
}

/// Address picked through an external address lookup.
///
/// Lookups may attach provider-specific keys; those are kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressValue {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

impl AddressValue {
    pub fn new(formatted_address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            lat: Some(lat),
            lng: Some(lng),
            extra: IndexMap::new(),
        }
    }
}

/// Image attached to a multi-image upload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageReference {
    /// Already stored image addressed by URL.
    Stored { url: String },
    /// Local file queued for upload.
    Pending { pending: String },
}

impl ImageReference {
    pub fn stored(url: impl Into<String>) -> Self {
        ImageReference::Stored { url: url.into() }
    }

    pub fn pending(path: impl Into<String>) -> Self {
        ImageReference::Pending { pending: path.into() }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageReference::Pending { .. })
    }

    /// URL or local path, whichever the reference carries.
    pub fn location(&self) -> &str {
        match self {
            ImageReference::Stored { url } => url,
            ImageReference::Pending { pending } => pending,
        }
    }
}

pub(crate) fn text_from_json(raw: &JsonValue) -> Option<String> {
    match raw {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn flag_from_json(raw: &JsonValue) -> Option<bool> {
    match raw {
        JsonValue::Bool(flag) => Some(*flag),
        JsonValue::String(text) => match text.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        JsonValue::Number(number) => number.as_i64().map(|n| n != 0),
        _ => None,
    }
}

pub(crate) fn list_from_json(raw: &JsonValue) -> Option<Vec<String>> {
    match raw {
        JsonValue::Array(_) => Some(strings_from_json(raw)),
        _ => None,
    }
}

pub(crate) fn images_from_json(raw: &JsonValue) -> Option<Vec<ImageReference>> {
    let JsonValue::Array(items) = raw else {
        return None;
    };
    let images = items
        .iter()
        .filter_map(|item| match item {
            JsonValue::String(url) => Some(ImageReference::stored(url.clone())),
            other => serde_json::from_value::<ImageReference>(other.clone()).ok(),
        })
        .collect();
    Some(images)
}
