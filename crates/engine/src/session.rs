//! Authoring session: the single owner of a form definition while it is being composed.
//!
//! Every surface of the authoring view (palette, canvas, properties panel, preview) reads a
//! snapshot from [`AuthoringSession`] and dispatches one of its operations; nothing else
//! mutates the field list. Selection and properties-panel visibility are tracked
//! separately: selecting a field sets both, toggling the panel flips only visibility.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use formwright_types::{FieldId, FieldKind, FieldPatch, FieldValue, FormDefinition, FormField};

use crate::interpreter::{self, AuthoringSignal, EditOutcome, FieldEdit, FieldView, RenderMode};

/// Prefix of identifiers generated by [`AuthoringSession::add_field`].
pub const GENERATED_ID_PREFIX: &str = "field_";

/// Transient selection state; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoringSelection {
    pub selected_field_id: Option<FieldId>,
    pub properties_panel_visible: bool,
}

/// Authoring state derived from [`AuthoringSelection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthoringState {
    Idle,
    FieldSelected(FieldId),
    FieldSelectedPanelHidden(FieldId),
}

/// In-memory authoring state for one form definition.
#[derive(Debug, Clone)]
pub struct AuthoringSession {
    definition: FormDefinition,
    selection: AuthoringSelection,
    /// Ephemeral values typed into the live preview, keyed by field.
    preview_values: IndexMap<FieldId, FieldValue>,
    /// Identifiers of removed fields; never handed out again.
    retired_ids: HashSet<FieldId>,
    next_sequence: u64,
    is_dirty: bool,
}

impl Default for AuthoringSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthoringSession {
    /// Starts composing an empty, untitled form.
    pub fn new() -> Self {
        Self::from_definition(FormDefinition::default())
    }

    /// Opens an existing definition for editing.
    ///
    /// Generated identifiers continue after the highest `field_<n>` already present.
    pub fn from_definition(definition: FormDefinition) -> Self {
        let next_sequence = definition
            .fields
            .iter()
            .filter_map(|field| field.id.as_str().strip_prefix(GENERATED_ID_PREFIX))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .map_or(1, |highest| highest.saturating_add(1));
        Self {
            definition,
            selection: AuthoringSelection::default(),
            preview_values: IndexMap::new(),
            retired_ids: HashSet::new(),
            next_sequence,
            is_dirty: false,
        }
    }

    // =====================
    // Snapshots
    // =====================

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    /// Clones the current definition for export.
    pub fn snapshot(&self) -> FormDefinition {
        self.definition.clone()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.definition.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&FormField> {
        self.definition.field(id)
    }

    pub fn selection(&self) -> &AuthoringSelection {
        &self.selection
    }

    pub fn selected_field_id(&self) -> Option<&FieldId> {
        self.selection.selected_field_id.as_ref()
    }

    pub fn selected_field(&self) -> Option<&FormField> {
        self.selected_field_id().and_then(|id| self.definition.field(id))
    }

    pub fn properties_visible(&self) -> bool {
        self.selection.properties_panel_visible
    }

    pub fn state(&self) -> AuthoringState {
        match (&self.selection.selected_field_id, self.selection.properties_panel_visible) {
            (None, _) => AuthoringState::Idle,
            (Some(id), true) => AuthoringState::FieldSelected(id.clone()),
            (Some(id), false) => AuthoringState::FieldSelectedPanelHidden(id.clone()),
        }
    }

    /// True when the definition changed since it was opened or last marked saved.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn mark_saved(&mut self) {
        self.is_dirty = false;
    }

    // =====================
    // Selection
    // =====================

    /// Selects `id` and shows the properties panel. Unknown ids are ignored.
    pub fn select_field(&mut self, id: &FieldId) {
        if !self.definition.contains(id) {
            debug!(field_id = %id, "ignoring selection of unknown field");
            return;
        }
        self.selection.selected_field_id = Some(id.clone());
        self.selection.properties_panel_visible = true;
    }

    /// Clears the selection and hides the properties panel.
    pub fn deselect(&mut self) {
        self.selection = AuthoringSelection::default();
    }

    /// Flips properties-panel visibility without touching the selection.
    pub fn toggle_properties(&mut self) {
        self.selection.properties_panel_visible = !self.selection.properties_panel_visible;
    }

    /// Moves the selection `delta` fields up or down, clamped to the list.
    ///
    /// With nothing selected, a positive delta selects the first field and a negative one the last.
    pub fn move_selection(&mut self, delta: isize) {
        let count = self.definition.fields.len();
        if count == 0 {
            return;
        }
        let target = match self.selected_field_id().and_then(|id| self.definition.position(id)) {
            Some(current) => current.saturating_add_signed(delta).min(count - 1),
            None if delta < 0 => count - 1,
            None => 0,
        };
        let id = self.definition.fields[target].id.clone();
        self.select_field(&id);
    }

    // =====================
    // Field list operations
    // =====================

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.definition.title = title.into();
        self.is_dirty = true;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.definition.description = description.into();
        self.is_dirty = true;
    }

    /// Appends a field of `kind` with its default attributes. Selection is unchanged.
    pub fn add_field(&mut self, kind: FieldKind) -> FieldId {
        let id = self.next_field_id();
        debug!(field_id = %id, %kind, "adding field");
        self.definition.fields.push(FormField::new(id.clone(), kind));
        self.is_dirty = true;
        id
    }

    /// Removes a field and retires its id. Removing the selected field returns to idle.
    pub fn remove_field(&mut self, id: &FieldId) {
        let Some(position) = self.definition.position(id) else {
            return;
        };
        debug!(field_id = %id, "removing field");
        self.definition.fields.remove(position);
        self.preview_values.shift_remove(id);
        self.retired_ids.insert(id.clone());
        if self.selected_field_id() == Some(id) {
            self.deselect();
        }
        self.is_dirty = true;
    }

    /// Moves a field to `new_index`, clamped to the list bounds.
    pub fn reorder_field(&mut self, id: &FieldId, new_index: usize) {
        let Some(position) = self.definition.position(id) else {
            return;
        };
        let target = new_index.min(self.definition.fields.len() - 1);
        if target == position {
            return;
        }
        let field = self.definition.fields.remove(position);
        self.definition.fields.insert(target, field);
        debug!(field_id = %id, from = position, to = target, "reordered field");
        self.is_dirty = true;
    }

    /// Merges `patch` into a field's attributes. Returns whether anything changed.
    pub fn update_field(&mut self, id: &FieldId, patch: FieldPatch) -> bool {
        let Some(field) = self.definition.field_mut(id) else {
            return false;
        };
        let changed = field.apply_patch(patch);
        if changed {
            debug!(field_id = %id, "updated field attributes");
            self.is_dirty = true;
        }
        changed
    }

    fn next_field_id(&mut self) -> FieldId {
        loop {
            let candidate = FieldId::new(format!("{GENERATED_ID_PREFIX}{}", self.next_sequence));
            self.next_sequence = self.next_sequence.saturating_add(1);
            if !self.retired_ids.contains(&candidate) && !self.definition.contains(&candidate) {
                return candidate;
            }
        }
    }

    // =====================
    // Rendering & preview
    // =====================

    /// Renders the canvas: every field in authoring-disabled mode.
    pub fn render_canvas(&self) -> Vec<FieldView> {
        interpreter::render_all(&self.definition.fields, RenderMode::AuthoringDisabled, |id| self.preview_values.get(id))
    }

    /// Renders the live preview with the values typed so far.
    pub fn render_preview(&self) -> Vec<FieldView> {
        interpreter::render_all(&self.definition.fields, RenderMode::Interactive, |id| self.preview_values.get(id))
    }

    /// Current preview value of a field, or its default.
    pub fn preview_value(&self, id: &FieldId) -> Option<FieldValue> {
        let field = self.definition.field(id)?;
        interpreter::normalized_value(field, self.preview_values.get(id))
    }

    /// Applies an interactive edit to the preview value of `id`.
    pub fn preview_edit(&mut self, id: &FieldId, edit: FieldEdit) -> EditOutcome {
        let Some(field) = self.definition.field(id) else {
            return EditOutcome::Ignored;
        };
        let outcome = interpreter::apply_edit(field, self.preview_values.get(id), RenderMode::Interactive, edit);
        if let EditOutcome::Changed(value) = &outcome {
            self.preview_values.insert(id.clone(), value.clone());
        }
        outcome
    }

    /// Stores a value resolved asynchronously (address lookup, image upload).
    ///
    /// Returns `false` and drops the value when the field has been removed meanwhile.
    pub fn apply_resolved_value(&mut self, id: &FieldId, value: FieldValue) -> bool {
        if !self.definition.contains(id) {
            debug!(field_id = %id, "dropping value resolved for a removed field");
            return false;
        }
        self.preview_values.insert(id.clone(), value);
        true
    }

    /// Routes a click on the disabled canvas control of `id`.
    pub fn canvas_interaction(&mut self, id: &FieldId, edit: FieldEdit) -> EditOutcome {
        let Some(field) = self.definition.field(id) else {
            return EditOutcome::Ignored;
        };
        let outcome = interpreter::apply_edit(field, self.preview_values.get(id), RenderMode::AuthoringDisabled, edit);
        if outcome == EditOutcome::Authoring(AuthoringSignal::ToggleProperties) {
            self.toggle_properties();
        }
        outcome
    }

    /// Discards every preview value.
    pub fn reset_preview(&mut self) {
        self.preview_values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(kinds: &[FieldKind]) -> (AuthoringSession, Vec<FieldId>) {
        let mut session = AuthoringSession::new();
        let ids = kinds.iter().cloned().map(|kind| session.add_field(kind)).collect();
        (session, ids)
    }

    fn order(session: &AuthoringSession) -> Vec<String> {
        session.fields().iter().map(|field| field.id.to_string()).collect()
    }

    #[test]
    fn add_field_appends_without_selecting() {
        let (session, ids) = session_with(&[FieldKind::Text, FieldKind::Select]);
        assert_eq!(order(&session), vec!["field_1", "field_2"]);
        assert_eq!(ids[1].as_str(), "field_2");
        assert_eq!(session.state(), AuthoringState::Idle);
        assert!(session.is_dirty());
    }

    #[test]
    fn selection_and_panel_visibility_are_decoupled() {
        let (mut session, ids) = session_with(&[FieldKind::Text]);
        session.select_field(&ids[0]);
        assert_eq!(session.state(), AuthoringState::FieldSelected(ids[0].clone()));

        session.toggle_properties();
        assert_eq!(session.state(), AuthoringState::FieldSelectedPanelHidden(ids[0].clone()));
        assert_eq!(session.selected_field_id(), Some(&ids[0]));

        session.select_field(&ids[0]);
        assert_eq!(session.state(), AuthoringState::FieldSelected(ids[0].clone()));

        session.deselect();
        session.deselect();
        assert_eq!(session.state(), AuthoringState::Idle);
        assert!(!session.properties_visible());
    }

    #[test]
    fn panel_can_open_with_nothing_selected() {
        let mut session = AuthoringSession::new();
        session.toggle_properties();
        assert!(session.properties_visible());
        assert_eq!(session.state(), AuthoringState::Idle);
        assert!(session.selected_field().is_none());
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let (mut session, _) = session_with(&[FieldKind::Text]);
        let ghost = FieldId::from("ghost");
        session.select_field(&ghost);
        session.remove_field(&ghost);
        session.reorder_field(&ghost, 0);
        assert!(!session.update_field(&ghost, FieldPatch::default().label("x")));
        assert_eq!(session.state(), AuthoringState::Idle);
        assert_eq!(session.fields().len(), 1);
    }

    #[test]
    fn removing_the_selected_field_returns_to_idle() {
        let (mut session, ids) = session_with(&[FieldKind::Text, FieldKind::Date]);
        session.select_field(&ids[1]);
        session.remove_field(&ids[1]);
        assert_eq!(session.state(), AuthoringState::Idle);
        assert!(!session.properties_visible());
    }

    #[test]
    fn removing_another_field_keeps_selection() {
        let (mut session, ids) = session_with(&[FieldKind::Text, FieldKind::Date]);
        session.select_field(&ids[1]);
        session.remove_field(&ids[0]);
        assert_eq!(session.state(), AuthoringState::FieldSelected(ids[1].clone()));
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let (mut session, ids) = session_with(&[FieldKind::Text, FieldKind::Text]);
        session.remove_field(&ids[1]);
        let next = session.add_field(FieldKind::Toggle);
        assert_eq!(next.as_str(), "field_3");
    }

    #[test]
    fn opened_definitions_continue_numbering() {
        let mut definition = FormDefinition::new("Vendor intake", "");
        definition.fields.push(FormField::new(FieldId::from("field_7"), FieldKind::Text));
        definition.fields.push(FormField::new(FieldId::from("legacy"), FieldKind::Text));
        let mut session = AuthoringSession::from_definition(definition);
        assert!(!session.is_dirty());
        assert_eq!(session.add_field(FieldKind::Text).as_str(), "field_8");
    }

    #[test]
    fn reorder_clamps_and_preserves_relative_order() {
        let (mut session, ids) = session_with(&[FieldKind::Text, FieldKind::Date, FieldKind::Toggle, FieldKind::Radio]);
        session.reorder_field(&ids[0], 2);
        assert_eq!(order(&session), vec!["field_2", "field_3", "field_1", "field_4"]);
        session.reorder_field(&ids[3], 99);
        assert_eq!(order(&session), vec!["field_2", "field_3", "field_1", "field_4"]);
        session.reorder_field(&ids[3], 0);
        assert_eq!(order(&session), vec!["field_4", "field_2", "field_3", "field_1"]);
    }

    #[test]
    fn reorder_yields_a_permutation_for_every_target() {
        let kinds = [FieldKind::Text, FieldKind::Date, FieldKind::Toggle, FieldKind::Radio, FieldKind::Email];
        for moved in 0..kinds.len() {
            for target in 0..kinds.len() + 2 {
                let (mut session, ids) = session_with(&kinds);
                let before = order(&session);
                session.reorder_field(&ids[moved], target);
                let after = order(&session);

                let mut sorted_before = before.clone();
                let mut sorted_after = after.clone();
                sorted_before.sort();
                sorted_after.sort();
                assert_eq!(sorted_before, sorted_after);

                let moved_id = ids[moved].to_string();
                let others_before: Vec<_> = before.iter().filter(|id| **id != moved_id).collect();
                let others_after: Vec<_> = after.iter().filter(|id| **id != moved_id).collect();
                assert_eq!(others_before, others_after);
                assert_eq!(after.iter().position(|id| *id == moved_id), Some(target.min(kinds.len() - 1)));
            }
        }
    }

    #[test]
    fn update_field_never_changes_identity() {
        let (mut session, ids) = session_with(&[FieldKind::Radio]);
        assert!(session.update_field(&ids[0], FieldPatch::default().label("Size").options(vec!["S".into(), "M".into()])));
        let field = session.field(&ids[0]).expect("field exists");
        assert_eq!(field.id, ids[0]);
        assert_eq!(field.kind, FieldKind::Radio);
        assert_eq!(field.label, "Size");
    }

    #[test]
    fn resolved_values_for_removed_fields_are_dropped() {
        let (mut session, ids) = session_with(&[FieldKind::Address]);
        session.remove_field(&ids[0]);
        let address = FieldValue::Address(formwright_types::AddressValue::new("1 Main St", 1.0, 2.0));
        assert!(!session.apply_resolved_value(&ids[0], address));
        assert!(session.preview_value(&ids[0]).is_none());
    }

    #[test]
    fn canvas_checkbox_click_toggles_properties() {
        let (mut session, ids) = session_with(&[FieldKind::Checkbox]);
        session.select_field(&ids[0]);
        session.canvas_interaction(&ids[0], FieldEdit::SetFlag(true));
        assert_eq!(session.state(), AuthoringState::FieldSelectedPanelHidden(ids[0].clone()));
        assert_eq!(session.preview_value(&ids[0]), Some(FieldValue::Flag(false)));
    }

    #[test]
    fn preview_edits_are_kept_per_field() {
        let (mut session, ids) = session_with(&[FieldKind::Text, FieldKind::Toggle]);
        session.preview_edit(&ids[0], FieldEdit::SetText("hello".into()));
        session.preview_edit(&ids[1], FieldEdit::SetFlag(true));
        assert_eq!(session.preview_value(&ids[0]), Some(FieldValue::Text("hello".into())));
        assert_eq!(session.preview_value(&ids[1]), Some(FieldValue::Flag(true)));
        let preview = session.render_preview();
        assert_eq!(preview.len(), 2);
        assert!(preview.iter().all(|view| !view.disabled));
        assert!(session.render_canvas().iter().all(|view| view.disabled));
    }

    #[test]
    fn move_selection_walks_the_list() {
        let (mut session, ids) = session_with(&[FieldKind::Text, FieldKind::Date, FieldKind::Toggle]);
        session.move_selection(1);
        assert_eq!(session.selected_field_id(), Some(&ids[0]));
        session.move_selection(5);
        assert_eq!(session.selected_field_id(), Some(&ids[2]));
        session.move_selection(-1);
        assert_eq!(session.selected_field_id(), Some(&ids[1]));
    }
}
