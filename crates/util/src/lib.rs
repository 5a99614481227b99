//! Configuration and filesystem helpers shared by the Formwright CLI and TUI.

pub mod config;
pub mod path_processing;

pub use config::{
    CONFIG_PATH_ENV, ConfigError, ConfigFile, EXPORT_DIR_ENV, FORMS_DIR_ENV, FormwrightConfig, LOG_PATH_ENV, default_config_path,
};
pub use path_processing::{expand_tilde, file_stem_for_title};
