// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Custom field values shape filter.
//!
//! A custom-field-values map must look like `{"<digits>": <value>}`. Entries
//! with a non-numeric key, or whose value is itself a mapping, are dropped.
//! List values are accepted as-is.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Sub-key under which custom field values travel inside a view section.
pub const CUSTOM_FIELD_VALUES: &str = "custom_field_values";

// ASCII only: `\d` would also accept non-ASCII decimal digits.
static CUSTOM_FIELD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static custom field id pattern"));

pub fn is_custom_field_id(key: &str) -> bool {
    CUSTOM_FIELD_ID.is_match(key)
}

/// Keep only the well-shaped entries of a custom-field-values value.
///
/// Returns `None` when `raw` is not a mapping or nothing survives, so callers
/// can omit the key entirely.
pub fn filter_custom_field_values(raw: &Value) -> Option<Map<String, Value>> {
    let entries = raw.as_object()?;

    let kept: Map<String, Value> = entries
        .iter()
        .filter(|(id, value)| {
            let keep = is_custom_field_id(id) && !value.is_object();
            if !keep {
                tracing::debug!(custom_field = %id, "Dropping malformed custom field value");
            }
            keep
        })
        .map(|(id, value)| (id.clone(), value.clone()))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_ids() {
        assert!(is_custom_field_id("1"));
        assert!(is_custom_field_id("0042"));
        assert!(!is_custom_field_id(""));
        assert!(!is_custom_field_id("blubs"));
        assert!(!is_custom_field_id("1a"));
        assert!(!is_custom_field_id("-1"));
        assert!(!is_custom_field_id("١"));
    }

    #[test]
    fn test_keeps_scalar_values() {
        let kept = filter_custom_field_values(&json!({ "1": "5" })).unwrap();
        assert_eq!(Value::Object(kept), json!({ "1": "5" }));
    }

    #[test]
    fn test_keeps_list_values() {
        let kept = filter_custom_field_values(&json!({ "3": ["a", "b"] })).unwrap();
        assert_eq!(Value::Object(kept), json!({ "3": ["a", "b"] }));
    }

    #[test]
    fn test_drops_malformed_entries() {
        let raw = json!({ "blubs": "5", "5": { "1": "2" } });
        assert!(filter_custom_field_values(&raw).is_none());
    }

    #[test]
    fn test_mixed_entries_keep_only_valid() {
        let raw = json!({ "blubs": "5", "7": "x", "5": { "1": "2" } });
        let kept = filter_custom_field_values(&raw).unwrap();
        assert_eq!(Value::Object(kept), json!({ "7": "x" }));
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        assert!(filter_custom_field_values(&json!("1=5")).is_none());
        assert!(filter_custom_field_values(&json!(["1", "5"])).is_none());
    }
}
