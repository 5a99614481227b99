//! Application state shared by every pane of the authoring TUI.
//!
//! `App` wraps the [`AuthoringSession`] (the only owner of the field list) together with
//! the purely presentational state of each pane: cursors, inline editors and the status
//! line. Components read it, call session operations, and return [`Effect`]s for the
//! runtime.

use std::path::PathBuf;

use formwright_engine::{AuthoringSession, EditOutcome, FieldEdit, serializer};
use formwright_types::{FieldId, FieldKind, FieldValue};
use tracing::{info, warn};

use crate::ui::components::common::InlineEditor;
use crate::ui::theme::{NordTheme, Theme};

/// Pane that currently receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Palette,
    Canvas,
    Properties,
    Preview,
}

impl Pane {
    pub fn title(self) -> &'static str {
        match self {
            Pane::Palette => "Fields",
            Pane::Canvas => "Canvas",
            Pane::Properties => "Properties",
            Pane::Preview => "Preview",
        }
    }
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Quit,
    Export,
    LookupAddress { field_id: FieldId, query: String },
}

/// Messages delivered to the app from outside the input stream.
#[derive(Debug)]
pub enum Msg {
    AddressResolved {
        field_id: FieldId,
        outcome: Result<Option<FieldEdit>, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

/// Cursor state of the properties pane.
#[derive(Debug, Default)]
pub struct PropertiesState {
    pub row: usize,
    pub slot: usize,
    pub editor: InlineEditor,
}

/// Cursor state of the preview pane.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub field_index: usize,
    /// Option, slot, image or date part under the cursor.
    pub item: usize,
    pub editor: InlineEditor,
}

impl PreviewState {
    pub fn select(&mut self, index: usize) {
        if index != self.field_index {
            self.field_index = index;
            self.item = 0;
        }
    }
}

pub struct App {
    pub session: AuthoringSession,
    pub export_path: PathBuf,
    pub focus: Pane,
    pub palette_index: usize,
    pub properties: PropertiesState,
    pub preview: PreviewState,
    pub status: Option<Status>,
    pub theme: Box<dyn Theme>,
    pub should_quit: bool,
    quit_armed: bool,
}

impl App {
    pub fn new(session: AuthoringSession, export_path: PathBuf) -> Self {
        Self {
            session,
            export_path,
            focus: Pane::Palette,
            palette_index: 0,
            properties: PropertiesState::default(),
            preview: PreviewState::default(),
            status: None,
            theme: Box::new(NordTheme::default()),
            should_quit: false,
            quit_armed: false,
        }
    }

    /// Panes reachable with Tab, in order. The properties pane is skipped while hidden.
    pub fn focus_order(&self) -> Vec<Pane> {
        let mut panes = vec![Pane::Palette, Pane::Canvas];
        if self.session.properties_visible() {
            panes.push(Pane::Properties);
        }
        panes.push(Pane::Preview);
        panes
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|pane| *pane == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Moves focus away from the properties pane once it is hidden.
    pub fn ensure_focus_visible(&mut self) {
        if !self.focus_order().contains(&self.focus) {
            self.focus = Pane::Canvas;
        }
    }

    pub fn set_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status = Some(Status {
            level,
            message: message.into(),
        });
    }

    pub fn add_palette_field(&mut self) {
        let Some(kind) = FieldKind::KNOWN.get(self.palette_index).cloned() else {
            return;
        };
        let label = kind.label().to_string();
        let id = self.session.add_field(kind);
        self.set_status(StatusLevel::Info, format!("Added {label} field '{id}'"));
    }

    /// Reports an edit outcome on the status line.
    pub fn report_outcome(&mut self, outcome: &EditOutcome) {
        match outcome {
            EditOutcome::Rejected(reason) => self.set_status(StatusLevel::Warning, reason.to_string()),
            EditOutcome::Fired(id) => {
                let label = self.session.field(id).map(|field| field.label.clone()).unwrap_or_default();
                self.set_status(StatusLevel::Info, format!("Button '{label}' pressed"));
            }
            EditOutcome::Changed(_) | EditOutcome::Authoring(_) | EditOutcome::Ignored => {}
        }
    }

    /// Handles `q`: the first press with unsaved changes only warns.
    pub fn request_quit(&mut self) -> Vec<Effect> {
        if self.session.is_dirty() && !self.quit_armed {
            self.quit_armed = true;
            self.set_status(StatusLevel::Warning, "Unsaved changes: press q again to quit, Ctrl+S to save");
            return Vec::new();
        }
        vec![Effect::Quit]
    }

    pub fn disarm_quit(&mut self) {
        self.quit_armed = false;
    }

    pub fn export(&mut self) {
        let form = self.session.snapshot();
        match serializer::export_to_path(&form, &self.export_path) {
            Ok(()) => {
                self.session.mark_saved();
                let message = format!("Saved to {}", self.export_path.display());
                self.set_status(StatusLevel::Success, message);
            }
            Err(error) => {
                warn!(error = %format!("{error:#}"), "export failed");
                self.set_status(StatusLevel::Error, format!("{error:#}"));
            }
        }
    }

    pub fn update(&mut self, msg: Msg) {
        match msg {
            Msg::AddressResolved { field_id, outcome } => match outcome {
                Ok(Some(FieldEdit::SetAddress(address))) => {
                    let formatted = address.formatted_address.clone();
                    if self.session.apply_resolved_value(&field_id, FieldValue::Address(address)) {
                        info!(field_id = %field_id, "address resolved");
                        self.set_status(StatusLevel::Success, format!("Address set to {formatted}"));
                    } else {
                        self.set_status(StatusLevel::Warning, "Address arrived after its field was removed");
                    }
                }
                Ok(_) => self.set_status(StatusLevel::Warning, "No address matched"),
                Err(error) => self.set_status(StatusLevel::Error, format!("Address lookup failed: {error}")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_types::AddressValue;

    fn app() -> App {
        App::new(AuthoringSession::new(), PathBuf::from("form.json"))
    }

    #[test]
    fn focus_skips_hidden_properties() {
        let mut app = app();
        app.cycle_focus(true);
        assert_eq!(app.focus, Pane::Canvas);
        app.cycle_focus(true);
        assert_eq!(app.focus, Pane::Preview);

        app.session.toggle_properties();
        app.focus = Pane::Canvas;
        app.cycle_focus(true);
        assert_eq!(app.focus, Pane::Properties);

        app.session.toggle_properties();
        app.ensure_focus_visible();
        assert_eq!(app.focus, Pane::Canvas);
    }

    #[test]
    fn quitting_with_unsaved_changes_needs_confirmation() {
        let mut app = app();
        app.add_palette_field();
        assert!(app.request_quit().is_empty());
        assert_eq!(app.request_quit(), vec![Effect::Quit]);
    }

    #[test]
    fn export_marks_the_session_saved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = App::new(AuthoringSession::new(), dir.path().join("out/form.json"));
        app.add_palette_field();
        app.export();
        assert!(!app.session.is_dirty());
        assert!(dir.path().join("out/form.json").exists());
        assert_eq!(app.status.as_ref().map(|status| status.level), Some(StatusLevel::Success));
    }

    #[test]
    fn late_addresses_for_removed_fields_are_dropped() {
        let mut app = app();
        let id = app.session.add_field(FieldKind::Address);
        app.session.remove_field(&id);
        app.update(Msg::AddressResolved {
            field_id: id.clone(),
            outcome: Ok(Some(FieldEdit::SetAddress(AddressValue::new("1 Main St", 1.0, 2.0)))),
        });
        assert!(app.session.preview_value(&id).is_none());
        assert_eq!(app.status.as_ref().map(|status| status.level), Some(StatusLevel::Warning));
    }
}
