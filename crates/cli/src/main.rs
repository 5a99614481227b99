use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formwright_util::FormwrightConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

/// Author, inspect, check and fill in dynamic form definitions.
#[derive(Parser, Debug)]
#[command(name = "formwright", version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the authoring TUI, optionally on an existing definition
    Edit {
        /// Definition to load (JSON or YAML)
        file: Option<PathBuf>,
        /// Where Ctrl+S writes the definition
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write an empty definition
    New {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a definition in read-only form, optionally with collected values
    Show {
        file: PathBuf,
        /// JSON object of values keyed by field id
        #[arg(long)]
        values: Option<PathBuf>,
    },
    /// Strictly parse a definition and report completeness problems
    Check { file: PathBuf },
    /// Fill in a stored definition and print the value bag
    Collect {
        /// Definition key inside the forms directory (file name without extension)
        key: String,
        /// Directory to look the definition up in, instead of the configured one
        #[arg(long)]
        source: Option<PathBuf>,
        /// Field value as ID=VALUE; VALUE is parsed as JSON when it can be
        #[arg(long = "set", value_name = "ID=VALUE")]
        assignments: Vec<String>,
    },
    /// List the field kinds this build understands
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = FormwrightConfig::load().context("failed to load configuration")?;

    match args.command.unwrap_or(Command::Edit { file: None, out: None }) {
        Command::Edit { file, out } => {
            init_file_tracing(&config)?;
            commands::edit(&config, file, out).await
        }
        Command::New { title, description, out } => {
            init_tracing(&config);
            commands::new(&config, &title, &description, out)
        }
        Command::Show { file, values } => {
            init_tracing(&config);
            commands::show(&file, values.as_deref())
        }
        Command::Check { file } => {
            init_tracing(&config);
            commands::check(&file)
        }
        Command::Collect { key, source, assignments } => {
            init_tracing(&config);
            commands::collect(&config, &key, source, &assignments).await
        }
        Command::Kinds => {
            init_tracing(&config);
            commands::kinds();
            Ok(())
        }
    }
}

fn env_filter(config: &FormwrightConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing(config: &FormwrightConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Sends logs to the configured file so they do not draw over the TUI.
fn init_file_tracing(config: &FormwrightConfig) -> Result<()> {
    let log_path: &Path = &config.log_path;
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
