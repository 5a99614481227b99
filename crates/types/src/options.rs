//! Option list helpers shared by every choice-shaped kind.

use serde_json::Value as JsonValue;

/// Drops empty and whitespace-only entries, keeping order and duplicates.
///
/// Applied at render time only; stored definitions keep their raw options.
pub fn filter_options(options: &[String]) -> Vec<String> {
    options.iter().filter(|option| !option.trim().is_empty()).cloned().collect()
}

/// Collects the string entries of a JSON array, skipping anything else.
pub fn strings_from_json(raw: &JsonValue) -> Vec<String> {
    match raw {
        JsonValue::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_entries_are_dropped() {
        let options = vec!["".to_string(), "  ".to_string(), "Red".to_string(), "Blue".to_string()];
        assert_eq!(filter_options(&options), vec!["Red", "Blue"]);
    }

    #[test]
    fn filtering_is_idempotent_and_keeps_duplicates() {
        let options = vec!["a".to_string(), "\t".to_string(), "a".to_string()];
        let once = filter_options(&options);
        assert_eq!(once, vec!["a", "a"]);
        assert_eq!(filter_options(&once), once);
    }

    #[test]
    fn non_string_json_entries_are_skipped() {
        assert_eq!(strings_from_json(&json!(["x", 1, null, "y", {"z": 1}])), vec!["x", "y"]);
        assert!(strings_from_json(&json!("x")).is_empty());
    }
}
