//! Converts rich multi-select options back to the keys the backend stores.
//!
//! Selection widgets bind whole `{key, stringValue}` options so they can
//! show labels, but updates must carry bare keys.

use formsync_types::FormSnapshot;
use serde_json::Value;

/// Whether `value` has the option shape: an object with string `key` and
/// `stringValue` members.
pub fn is_enum_option(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        obj.get("key").is_some_and(Value::is_string)
            && obj.get("stringValue").is_some_and(Value::is_string)
    })
}

/// Whether `value` is a non-empty list made only of options.
pub fn is_enum_selection(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty() && items.iter().all(is_enum_option),
        _ => false,
    }
}

/// Replaces an option list with its keys; returns anything else unchanged.
pub fn normalize_value(value: Value) -> Value {
    if !is_enum_selection(&value) {
        return value;
    }
    let Value::Array(items) = value else {
        return value;
    };
    Value::Array(
        items
            .into_iter()
            .filter_map(|mut item| item.as_object_mut().and_then(|obj| obj.remove("key")))
            .collect(),
    )
}

/// Normalizes every field of a snapshot. Idempotent, never fails.
pub fn normalize_enum_selections(snapshot: FormSnapshot) -> FormSnapshot {
    snapshot.map_values(normalize_value)
}
