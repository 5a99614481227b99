use formwright_engine::{
    AddressLookup, AuthoringSession, AuthoringState, CollaboratorError, CollectionInstance, Control, EditOutcome, EditRejection,
    FieldEdit, PropertyKey, RenderMode, apply_edit, apply_property_edit, resolve_address, serializer,
};
use formwright_types::{AddressValue, DateRange, FieldId, FieldKind, FieldValue, FormField};
use serde_json::json;

fn load_fixture() -> AuthoringSession {
    let document = include_str!("data/vendor_intake.json");
    let form = serializer::from_json_str(document).expect("load fixture definition");
    AuthoringSession::from_definition(form)
}

#[test]
fn adding_text_and_select_fields_starts_from_defaults() {
    let mut session = AuthoringSession::new();
    let text = session.add_field(FieldKind::Text);
    let select = session.add_field(FieldKind::Select);

    assert_eq!(session.fields().len(), 2);
    assert_eq!(session.fields()[0].kind, FieldKind::Text);
    assert_eq!(session.fields()[1].kind, FieldKind::Select);
    assert_eq!(session.preview_value(&text), Some(FieldValue::Text(String::new())));
    assert_eq!(session.preview_value(&select), Some(FieldValue::Text(String::new())));

    let preview = session.render_preview();
    let Control::SingleChoice { choices, .. } = &preview[1].control else {
        panic!("select should render a single choice control, got {:?}", preview[1].control);
    };
    assert!(choices.is_empty(), "choices: {:?}", choices);
}

#[test]
fn select_renders_only_non_blank_options() {
    let mut select = FormField::new(FieldId::from("colour"), FieldKind::Select);
    select.options = vec!["".into(), "  ".into(), "Red".into(), "Blue".into()];
    let view = formwright_engine::render(&select, None, RenderMode::Interactive).expect("select renders");
    let Control::SingleChoice { choices, .. } = view.control else {
        panic!("expected a single choice control");
    };
    assert_eq!(choices, vec!["Red", "Blue"]);
}

#[test]
fn button_group_never_drops_below_one_slot() {
    let field = FormField::new(FieldId::from("slots"), FieldKind::ButtonGroup);
    let mut value = field.default_value();
    assert_eq!(value, Some(FieldValue::List(vec![String::new()])));

    let steps = [FieldEdit::AddSlot, FieldEdit::AddSlot, FieldEdit::RemoveSlot(1), FieldEdit::RemoveSlot(0)];
    let expected_lengths = [2, 3, 2, 1];
    for (edit, expected) in steps.into_iter().zip(expected_lengths) {
        let outcome = apply_edit(&field, value.as_ref(), RenderMode::Interactive, edit);
        value = outcome.changed_value().cloned();
        assert_eq!(value.as_ref().and_then(FieldValue::as_list).map(<[String]>::len), Some(expected));
    }

    let refused = apply_edit(&field, value.as_ref(), RenderMode::Interactive, FieldEdit::RemoveSlot(0));
    assert_eq!(refused, EditOutcome::Rejected(EditRejection::LastSlot));
    assert_eq!(value, Some(FieldValue::List(vec![String::new()])));
}

#[test]
fn date_range_start_edit_leaves_end_untouched() {
    let field = FormField::new(FieldId::from("stay"), FieldKind::DateRange);
    let outcome = apply_edit(&field, None, RenderMode::Interactive, FieldEdit::SetRangeStart("2024-01-01".into()));
    assert_eq!(
        outcome.changed_value(),
        Some(&FieldValue::DateRange(DateRange {
            start_date: "2024-01-01".into(),
            end_date: String::new(),
        }))
    );
    assert_eq!(outcome.changed_value().map(FieldValue::to_json), Some(json!({"startDate": "2024-01-01", "endDate": ""})));
}

#[test]
fn fixture_round_trips_through_export() {
    let session = load_fixture();
    let form = session.snapshot();
    assert_eq!(form.fields[0].id.as_str(), "1712345678901");
    assert_eq!(form.fields[2].options, vec!["", "Gold", "  ", "Silver"]);
    assert_eq!(form.fields[7].kind.as_str(), "signature-pad");

    let restored = serializer::from_json_str(&serializer::to_json_string(&form).expect("export")).expect("re-import");
    assert_eq!(restored, form);
    assert_eq!(restored.fields[3].metadata.get("x-owner"), Some(&json!("ops")));

    let exported = serializer::serialize(&form).expect("export");
    assert_eq!(exported["fields"][0]["kind"], json!("text"));
    assert_eq!(exported["fields"][5]["kind"], json!("Address"));
}

#[test]
fn unknown_kinds_are_kept_but_not_rendered() {
    let session = load_fixture();
    let canvas = session.render_canvas();
    assert_eq!(canvas.len(), session.fields().len() - 1);
    assert!(canvas.iter().all(|view| view.id.as_str() != "signature"));
    assert!(session.definition().completeness_issues().iter().any(|issue| issue.to_string().contains("signature-pad")));
}

#[test]
fn selection_survives_panel_toggles_and_reorders() {
    let mut session = load_fixture();
    let tier = FieldId::from("tier");
    session.select_field(&tier);
    session.toggle_properties();
    session.reorder_field(&tier, 0);
    assert_eq!(session.state(), AuthoringState::FieldSelectedPanelHidden(tier.clone()));
    assert_eq!(session.fields()[0].id, tier);

    session.toggle_properties();
    assert_eq!(session.state(), AuthoringState::FieldSelected(tier));
}

#[test]
fn properties_panel_edits_reach_the_export() {
    let mut session = load_fixture();
    session.select_field(&FieldId::from("perks"));
    apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::AddSlot);
    apply_property_edit(&mut session, PropertyKey::Options, FieldEdit::SetSlot { index: 2, text: "Coffee".into() });
    apply_property_edit(&mut session, PropertyKey::Required, FieldEdit::SetFlag(true));

    let exported = serializer::serialize(&session.snapshot()).expect("export");
    assert_eq!(exported["fields"][3]["metadata"]["options"], json!(["Wifi", "Parking", "Coffee"]));
    assert_eq!(exported["fields"][3]["metadata"]["x-owner"], json!("ops"));
    assert_eq!(exported["fields"][3]["required"], json!(true));
    assert!(session.is_dirty());
}

#[test]
fn checkbox_group_values_are_tracked_per_option() {
    let mut session = load_fixture();
    let perks = FieldId::from("perks");
    session.preview_edit(&perks, FieldEdit::SetOption { option: "Parking".into(), checked: true });
    let Some(FieldValue::FlagSet(flags)) = session.preview_value(&perks) else {
        panic!("checkbox with options should hold a flag set");
    };
    assert_eq!(flags.get("Wifi"), Some(&false));
    assert_eq!(flags.get("Parking"), Some(&true));
}

struct OneAddress;

#[async_trait::async_trait]
impl AddressLookup for OneAddress {
    async fn search(&self, query: &str) -> Result<Vec<AddressValue>, CollaboratorError> {
        Ok(vec![AddressValue::new(format!("{query}, Springfield"), 39.8, -89.6)])
    }
}

#[tokio::test]
async fn address_resolved_after_removal_is_ignored() {
    let mut session = load_fixture();
    let site = FieldId::from("site");
    let edit = resolve_address(&OneAddress, "12 Elm St").await.expect("lookup").expect("a match");

    let outcome = session.preview_edit(&site, edit.clone());
    assert!(outcome.changed_value().is_some());

    session.remove_field(&site);
    assert_eq!(session.preview_edit(&site, edit), EditOutcome::Ignored);
    let late = FieldValue::Address(AddressValue::new("late", 0.0, 0.0));
    assert!(!session.apply_resolved_value(&site, late));
    assert!(session.preview_value(&site).is_none());
}

#[test]
fn collection_bag_uses_field_ids() {
    let form = load_fixture().snapshot();
    let mut instance = CollectionInstance::with_values(form, &json!({"contact": "ops@acme.test", "tier": "Gold"}));
    instance.apply_edit(&FieldId::from("slots"), FieldEdit::SetSlot { index: 0, text: "Dock 4".into() });
    instance.apply_edit(&FieldId::from("send"), FieldEdit::Press);

    let bag = instance.to_json();
    assert_eq!(bag["contact"], json!("ops@acme.test"));
    assert_eq!(bag["tier"], json!("Gold"));
    assert_eq!(bag["slots"], json!(["Dock 4"]));
    assert_eq!(bag["perks"], json!({"Wifi": false, "Parking": false}));
    assert_eq!(bag["site"], json!(null));
    assert!(bag.get("send").is_none());
    assert!(bag.get("signature").is_none());
    assert_eq!(instance.take_events(), vec![FieldId::from("send")]);
}
