//! Subcommand implementations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use formwright_engine::{
    AuthoringSession, CollectionInstance, DefinitionSource, DirectorySource, NullAddressLookup, RenderMode, export_to_path, import_from_path,
};
use formwright_types::{FieldId, FieldKind, FormDefinition, OptionsRequirement};
use formwright_util::{FormwrightConfig, file_stem_for_title};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::display::form_text;

/// Where a definition is written when no `--out` is given.
///
/// A JSON source is saved in place; anything else goes to the export directory under a
/// name derived from the title.
fn default_export_path(config: &FormwrightConfig, source: Option<&Path>, definition: &FormDefinition) -> PathBuf {
    if let Some(path) = source
        && path.extension().is_some_and(|extension| extension == "json")
    {
        return path.to_path_buf();
    }
    config.export_dir.join(format!("{}.json", file_stem_for_title(&definition.title)))
}

pub async fn edit(config: &FormwrightConfig, file: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let session = match &file {
        Some(path) => AuthoringSession::from_definition(import_from_path(path)?),
        None => AuthoringSession::new(),
    };
    let export_path = out.unwrap_or_else(|| default_export_path(config, file.as_deref(), session.definition()));
    info!(export_path = %export_path.display(), "opening authoring session");
    formwright_tui::run(session, export_path, Arc::new(NullAddressLookup)).await
}

pub fn new(config: &FormwrightConfig, title: &str, description: &str, out: Option<PathBuf>) -> Result<()> {
    let definition = FormDefinition::new(title, description);
    let path = out.unwrap_or_else(|| default_export_path(config, None, &definition));
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    export_to_path(&definition, &path)?;
    println!("{}", path.display());
    Ok(())
}

pub fn show(file: &Path, values: Option<&Path>) -> Result<()> {
    let definition = import_from_path(file)?;
    let instance = match values {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("failed to read values from {}", path.display()))?;
            let values: JsonValue = serde_json::from_str(&text).with_context(|| format!("values in {} are not valid JSON", path.display()))?;
            CollectionInstance::with_values(definition, &values)
        }
        None => CollectionInstance::new(definition),
    };
    print!("{}", form_text(instance.definition(), &instance.render(RenderMode::ReadOnly)));
    Ok(())
}

pub fn check(file: &Path) -> Result<()> {
    let definition = import_from_path(file)?;
    let issues = definition.completeness_issues();
    for issue in &issues {
        println!("warning: {issue}");
    }
    println!(
        "{}: {} field(s), schema version {}, {} warning(s)",
        file.display(),
        definition.fields.len(),
        definition.schema_version,
        issues.len()
    );
    Ok(())
}

pub async fn collect(config: &FormwrightConfig, key: &str, source: Option<PathBuf>, assignments: &[String]) -> Result<()> {
    let source = DirectorySource::new(source.unwrap_or_else(|| config.forms_dir.clone()));
    let definition = source
        .fetch(key)
        .await
        .with_context(|| format!("failed to load definition '{key}' from {}", source.root().display()))?;

    let mut instance = CollectionInstance::new(definition);
    for assignment in assignments {
        let (id, raw) = parse_assignment(assignment)?;
        let Some(field) = instance.definition().field(&id) else {
            bail!("form has no field '{id}'");
        };
        if field.default_value().is_none() {
            bail!("field '{id}' ({}) does not hold a value", field.kind);
        }
        let Some(value) = field.read_value(&raw) else {
            bail!("field '{id}' rejected {raw}");
        };
        if !instance.set_value(&id, value) {
            bail!("field '{id}' rejected {raw}");
        }
    }
    println!("{}", serde_json::to_string_pretty(&instance.to_json())?);
    Ok(())
}

pub fn kinds() {
    for kind in FieldKind::KNOWN {
        let Some(descriptor) = kind.descriptor() else {
            continue;
        };
        let note = match descriptor.options {
            OptionsRequirement::Always => "  (needs options)",
            OptionsRequirement::FromMetadata => "  (options via metadata)",
            OptionsRequirement::Never => "",
        };
        println!("{:<14}{}{note}", descriptor.name, descriptor.label);
    }
}

/// Splits `ID=VALUE`. The value is read as JSON when possible, otherwise as a string.
fn parse_assignment(assignment: &str) -> Result<(FieldId, JsonValue)> {
    let Some((id, raw)) = assignment.split_once('=') else {
        bail!("expected ID=VALUE, got '{assignment}'");
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("missing field id in '{assignment}'");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));
    Ok((FieldId::from(id), value))
}
