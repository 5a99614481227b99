use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Turns a form title into a lowercase, dash-separated file stem.
///
/// Returns `"untitled-form"` when the title has no usable characters.
pub fn file_stem_for_title(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for character in title.chars() {
        if character.is_alphanumeric() {
            stem.extend(character.to_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let trimmed = stem.trim_end_matches('-');
    if trimmed.is_empty() { "untitled-form".to_string() } else { trimmed.to_string() }
}
