//! Strongly typed form definition schema shared by the engine, the TUI and the CLI.
//!
//! A [`FormDefinition`] is pure data: an ordered list of [`FormField`] nodes, each tagged
//! with a [`FieldKind`]. The kind registry in [`kind`] says what value each kind holds,
//! what its default is and whether it needs options; [`FieldValue`] is the runtime value
//! those kinds produce.

pub mod definition;
pub mod field;
pub mod kind;
pub mod options;
pub mod value;

pub use definition::{CURRENT_SCHEMA_VERSION, CompletenessIssue, FormDefinition};
pub use field::{FieldId, FieldPatch, FormField, METADATA_OPTIONS_KEY};
pub use kind::{FieldKind, KindDescriptor, OptionsRequirement, ValueShape};
pub use options::{filter_options, strings_from_json};
pub use value::{AddressValue, DateRange, FieldValue, ImageReference};
