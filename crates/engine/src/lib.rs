//! # Formwright Engine
//!
//! The Formwright Engine turns declarative form definitions into renderable controls,
//! owns the authoring state while a form is being composed, and reads and writes the
//! exported JSON document.
//!
//! ## Key Features
//!
//! - **Field Interpreter**: Pure `(field, value, mode) -> view` rendering for every field kind
//! - **Authoring Session**: Selection, properties-panel visibility, add/remove/reorder/update
//! - **Properties Editor**: The properties panel is itself a form driven by the interpreter
//! - **Serializer**: Strict JSON/YAML import with key-path errors, pretty JSON export
//! - **Collection Mode**: Collects values for a finished form and emits the value bag
//!
//! ## Usage
//!
//! ```rust
//! use formwright_engine::{AuthoringSession, FieldEdit, serializer};
//! use formwright_types::FieldKind;
//!
//! let mut session = AuthoringSession::new();
//! session.set_title("Vendor intake");
//! let email = session.add_field(FieldKind::Email);
//! session.preview_edit(&email, FieldEdit::SetText("ops@example.com".into()));
//!
//! let exported = serializer::to_json_string(&session.snapshot())?;
//! let restored = serializer::from_json_str(&exported)?;
//! assert_eq!(restored, session.snapshot());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`interpreter`**: View models and edit normalization
//! - **`session`**: The single owner of the field list while authoring
//! - **`properties`**: Property sheets and their mapping onto field patches
//! - **`serializer`**: Document import/export
//! - **`collection`**: Data-collection instances
//! - **`collaborators`**: Async address lookup, image storage and definition sources

pub mod collaborators;
pub mod collection;
pub mod interpreter;
pub mod properties;
pub mod serializer;
pub mod session;

// Re-export commonly used types for convenience
pub use collaborators::{
    AddressLookup, CollaboratorError, DefinitionSource, DirectorySource, ImageStore, NullAddressLookup, NullImageStore, resolve_address,
    upload_pending,
};
pub use collection::CollectionInstance;
pub use interpreter::{
    AuthoringSignal, ChoiceItem, ChoiceStyle, Control, EditOutcome, EditRejection, FieldEdit, FieldView, RenderMode, SlotView, SwitchStyle,
    TextInputKind, apply_edit, render, render_all,
};
pub use properties::{PropertyKey, PropertySheet, apply_property_edit, property_sheet};
pub use serializer::{DefinitionError, DefinitionProblem, export_to_path, import_from_path};
pub use session::{AuthoringSelection, AuthoringSession, AuthoringState};
