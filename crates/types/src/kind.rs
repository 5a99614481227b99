//! Field kind taxonomy and the registry describing each kind's value semantics.
//!
//! Every interpreter backend (canvas, preview, collection, CLI rendering) consults
//! [`KindDescriptor`] rather than matching on kind names itself, so adding a kind only
//! requires extending the table below.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Tagged variant identifying what a field is.
///
/// Wire names follow the authoring tool's historical spelling, including the two
/// capitalized composite kinds. Any unrecognized name is preserved verbatim in
/// [`FieldKind::Unknown`] so definitions authored by newer tools survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    Textarea,
    Select,
    Dropdown,
    Checkbox,
    Radio,
    Toggle,
    Button,
    ButtonGroup,
    MultiSelect,
    DateRange,
    Address,
    MultiImageUpload,
    /// A kind this build does not understand. Renders as nothing.
    Unknown(String),
}

/// Shape of the value a kind produces and consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Free text; numeric kinds are still transported as strings.
    Text,
    /// ISO-8601 calendar date (`YYYY-MM-DD`) carried as a string.
    IsoDate,
    /// One string drawn from the filtered options.
    SingleChoice,
    /// A boolean, or one boolean per option when the field carries metadata options.
    Flag,
    /// Ordered list of free strings with a floor of one slot.
    TextSlots,
    /// Ordered list of strings drawn from the filtered options.
    MultiChoice,
    /// `{ startDate, endDate }` composite.
    DateRange,
    /// Address composite produced by an address lookup.
    Address,
    /// Ordered list of image references.
    ImageList,
    /// The kind does not hold a value (buttons, unknown kinds).
    Valueless,
}

/// Whether a kind needs an options list to be complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsRequirement {
    Never,
    /// Options come from the field's `options` attribute.
    Always,
    /// Options are optional and read from `metadata.options`; their presence changes the value shape.
    FromMetadata,
}

/// Static description of a single kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDescriptor {
    /// Wire name used in serialized definitions.
    pub name: &'static str,
    /// Human-readable label shown in palettes.
    pub label: &'static str,
    pub shape: ValueShape,
    pub options: OptionsRequirement,
    /// Text-shaped kinds honor `placeholder`.
    pub text_shaped: bool,
}

const TEXT_KIND: KindDescriptor = KindDescriptor {
    name: "text",
    label: "Text",
    shape: ValueShape::Text,
    options: OptionsRequirement::Never,
    text_shaped: true,
};

impl FieldKind {
    /// Every kind this build knows about, in palette order.
    pub const KNOWN: [FieldKind; 16] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Number,
        FieldKind::Textarea,
        FieldKind::Date,
        FieldKind::DateRange,
        FieldKind::Select,
        FieldKind::Dropdown,
        FieldKind::Radio,
        FieldKind::MultiSelect,
        FieldKind::Checkbox,
        FieldKind::Toggle,
        FieldKind::Button,
        FieldKind::ButtonGroup,
        FieldKind::Address,
        FieldKind::MultiImageUpload,
    ];

    /// Returns the registry entry for this kind, or `None` for unknown kinds.
    pub fn descriptor(&self) -> Option<KindDescriptor> {
        let descriptor = match self {
            FieldKind::Text => TEXT_KIND,
            FieldKind::Email => KindDescriptor {
                name: "email",
                label: "Email",
                ..TEXT_KIND
            },
            FieldKind::Number => KindDescriptor {
                name: "number",
                label: "Number",
                ..TEXT_KIND
            },
            FieldKind::Textarea => KindDescriptor {
                name: "textarea",
                label: "Paragraph",
                ..TEXT_KIND
            },
            FieldKind::Date => KindDescriptor {
                name: "date",
                label: "Date",
                shape: ValueShape::IsoDate,
                ..TEXT_KIND
            },
            FieldKind::Select => KindDescriptor {
                name: "select",
                label: "Select",
                shape: ValueShape::SingleChoice,
                options: OptionsRequirement::Always,
                text_shaped: false,
            },
            FieldKind::Dropdown => KindDescriptor {
                name: "dropdown",
                label: "Dropdown",
                shape: ValueShape::SingleChoice,
                options: OptionsRequirement::Always,
                text_shaped: false,
            },
            FieldKind::Radio => KindDescriptor {
                name: "radio",
                label: "Radio group",
                shape: ValueShape::SingleChoice,
                options: OptionsRequirement::Always,
                text_shaped: false,
            },
            FieldKind::Checkbox => KindDescriptor {
                name: "checkbox",
                label: "Checkbox",
                shape: ValueShape::Flag,
                options: OptionsRequirement::FromMetadata,
                text_shaped: false,
            },
            FieldKind::Toggle => KindDescriptor {
                name: "toggle",
                label: "Toggle",
                shape: ValueShape::Flag,
                options: OptionsRequirement::Never,
                text_shaped: false,
            },
            FieldKind::Button => KindDescriptor {
                name: "button",
                label: "Button",
                shape: ValueShape::Valueless,
                options: OptionsRequirement::Never,
                text_shaped: false,
            },
            FieldKind::ButtonGroup => KindDescriptor {
                name: "button-group",
                label: "Button group",
                shape: ValueShape::TextSlots,
                options: OptionsRequirement::Never,
                text_shaped: false,
            },
            FieldKind::MultiSelect => KindDescriptor {
                name: "multi-select",
                label: "Multi-select",
                shape: ValueShape::MultiChoice,
                options: OptionsRequirement::Always,
                text_shaped: false,
            },
            FieldKind::DateRange => KindDescriptor {
                name: "date-range",
                label: "Date range",
                shape: ValueShape::DateRange,
                options: OptionsRequirement::Never,
                text_shaped: false,
            },
            FieldKind::Address => KindDescriptor {
                name: "Address",
                label: "Address",
                shape: ValueShape::Address,
                options: OptionsRequirement::Never,
                text_shaped: false,
            },
            FieldKind::MultiImageUpload => KindDescriptor {
                name: "MultiImageUpload",
                label: "Image upload",
                shape: ValueShape::ImageList,
                options: OptionsRequirement::Never,
                text_shaped: false,
            },
            FieldKind::Unknown(_) => return None,
        };
        Some(descriptor)
    }

    /// Wire name of the kind. Unknown kinds return their raw name.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Unknown(raw) => raw.as_str(),
            known => known.descriptor().map(|descriptor| descriptor.name).unwrap_or_default(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FieldKind::Unknown(_))
    }

    /// Value shape, treating unknown kinds as valueless.
    pub fn shape(&self) -> ValueShape {
        self.descriptor().map_or(ValueShape::Valueless, |descriptor| descriptor.shape)
    }

    pub fn is_text_shaped(&self) -> bool {
        self.descriptor().is_some_and(|descriptor| descriptor.text_shaped)
    }

    /// True for kinds whose value is drawn from the `options` attribute.
    pub fn is_choice_shaped(&self) -> bool {
        self.descriptor()
            .is_some_and(|descriptor| descriptor.options == OptionsRequirement::Always)
    }

    /// Default value for a freshly created field of this kind.
    ///
    /// Checkbox groups depend on field metadata; use
    /// [`FormField::default_value`](crate::FormField::default_value) when a field is available.
    /// Returns `None` for kinds that hold no value.
    pub fn default_value(&self) -> Option<FieldValue> {
        let value = match self.shape() {
            ValueShape::Text | ValueShape::IsoDate | ValueShape::SingleChoice => FieldValue::Text(String::new()),
            ValueShape::Flag => FieldValue::Flag(false),
            ValueShape::TextSlots => FieldValue::List(vec![String::new()]),
            ValueShape::MultiChoice => FieldValue::List(Vec::new()),
            ValueShape::DateRange => FieldValue::DateRange(Default::default()),
            ValueShape::Address => FieldValue::Unset,
            ValueShape::ImageList => FieldValue::Images(Vec::new()),
            ValueShape::Valueless => return None,
        };
        Some(value)
    }

    /// Palette label, falling back to the raw name for unknown kinds.
    pub fn label(&self) -> &str {
        match self.descriptor() {
            Some(descriptor) => descriptor.label,
            None => self.as_str(),
        }
    }
}

impl From<String> for FieldKind {
    fn from(raw: String) -> Self {
        FieldKind::KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .unwrap_or(FieldKind::Unknown(raw))
    }
}

impl From<&str> for FieldKind {
    fn from(raw: &str) -> Self {
        FieldKind::from(raw.to_string())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_for_every_known_kind() {
        for kind in FieldKind::KNOWN {
            let parsed = FieldKind::from(kind.as_str());
            assert_eq!(parsed, kind, "kind {kind} did not parse back");
        }
    }

    #[test]
    fn unrecognized_names_are_preserved() {
        let kind = FieldKind::from("signature-pad");
        assert_eq!(kind, FieldKind::Unknown("signature-pad".to_string()));
        assert_eq!(kind.as_str(), "signature-pad");
        assert!(kind.default_value().is_none());
        assert!(kind.descriptor().is_none());
    }

    #[test]
    fn wire_names_are_case_sensitive() {
        assert_eq!(FieldKind::from("Address"), FieldKind::Address);
        assert!(matches!(FieldKind::from("address"), FieldKind::Unknown(_)));
        assert!(matches!(FieldKind::from("Text"), FieldKind::Unknown(_)));
    }

    #[test]
    fn defaults_follow_value_shapes() {
        assert_eq!(FieldKind::Text.default_value(), Some(FieldValue::Text(String::new())));
        assert_eq!(FieldKind::Select.default_value(), Some(FieldValue::Text(String::new())));
        assert_eq!(FieldKind::Toggle.default_value(), Some(FieldValue::Flag(false)));
        assert_eq!(FieldKind::ButtonGroup.default_value(), Some(FieldValue::List(vec![String::new()])));
        assert_eq!(FieldKind::MultiSelect.default_value(), Some(FieldValue::List(Vec::new())));
        assert_eq!(FieldKind::Address.default_value(), Some(FieldValue::Unset));
        assert_eq!(FieldKind::MultiImageUpload.default_value(), Some(FieldValue::Images(Vec::new())));
        assert_eq!(FieldKind::Button.default_value(), None);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&FieldKind::ButtonGroup).expect("serialize kind");
        assert_eq!(json, "\"button-group\"");
        let kind: FieldKind = serde_json::from_str("\"MultiImageUpload\"").expect("deserialize kind");
        assert_eq!(kind, FieldKind::MultiImageUpload);
    }
}
