//! # Formwright TUI
//!
//! Terminal authoring surface for form definitions, built on Ratatui.
//!
//! ## Key Features
//!
//! - Palette of field kinds that appends fields to the form
//! - Canvas showing every field in its disabled authoring rendering
//! - Properties panel rendered as a form of its own
//! - Live preview where every control can be exercised
//! - Export through the engine serializer (`Ctrl+S`)
//!
//! ## Architecture
//!
//! Every pane is a component that reads the [`AuthoringSession`] owned by `App` and
//! dispatches session operations; components report side effects (export, address
//! lookups, quitting) as `Effect`s the runtime executes.

mod app;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use formwright_engine::{AddressLookup, AuthoringSession};

/// Runs the authoring TUI until the user quits.
///
/// `export_path` is where `Ctrl+S` writes the definition. Address lookups started from
/// the preview go through `address_lookup`.
pub async fn run(session: AuthoringSession, export_path: PathBuf, address_lookup: Arc<dyn AddressLookup>) -> Result<()> {
    ui::runtime::run_app(session, export_path, address_lookup).await
}
