use formsync_autosave::{is_enum_option, is_enum_selection, normalize_enum_selections, normalize_value};
use formsync_types::{EnumOption, FormSnapshot};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn options(keys: &[&str]) -> Value {
    Value::Array(
        keys.iter()
            .map(|k| EnumOption::new(*k, format!("{k} label")).to_value())
            .collect(),
    )
}

// ── Shape detection ──────────────────────────────────────────────

#[test]
fn recognizes_option_shape() {
    assert!(is_enum_option(&json!({"key": "A", "stringValue": "Alpha"})));
    assert!(!is_enum_option(&json!({"key": "A"})));
    assert!(!is_enum_option(&json!({"id": 1, "name": "Kenya"})));
    assert!(!is_enum_option(&json!("A")));
}

#[test]
fn selection_must_be_non_empty_and_uniform() {
    assert!(is_enum_selection(&options(&["A", "B"])));
    assert!(!is_enum_selection(&json!([])));
    assert!(!is_enum_selection(&json!([{"key": "A", "stringValue": "Alpha"}, "B"])));
    assert!(!is_enum_selection(&json!({"key": "A", "stringValue": "Alpha"})));
}

// ── Normalization ────────────────────────────────────────────────

#[test]
fn replaces_option_lists_with_keys() {
    let snap = FormSnapshot::new()
        .with("name", "Ana")
        .with("languages", options(&["EN", "AR"]))
        .with("age", 31);

    let normalized = normalize_enum_selections(snap);

    assert_eq!(
        normalized.into_value(),
        json!({"name": "Ana", "languages": ["EN", "AR"], "age": 31})
    );
}

#[test]
fn leaves_other_shapes_untouched() {
    let snap = FormSnapshot::new()
        .with("countries", json!([{"id": 1, "name": "Kenya"}]))
        .with("empty", json!([]))
        .with("mixed", json!([{"key": "A", "stringValue": "Alpha"}, 3]))
        .with("single", json!({"key": "A", "stringValue": "Alpha"}))
        .with("nothing", Value::Null);

    let normalized = normalize_enum_selections(snap.clone());

    assert_eq!(normalized, snap);
}

#[test]
fn keeps_field_order() {
    let snap = FormSnapshot::new()
        .with("z", options(&["A"]))
        .with("a", 1);
    let fields: Vec<String> = normalize_enum_selections(snap)
        .iter()
        .map(|(k, _)| k.clone())
        .collect();
    assert_eq!(fields, vec!["z".to_string(), "a".to_string()]);
}

#[test]
fn extra_option_members_are_dropped() {
    let value = json!([{"key": "A", "stringValue": "Alpha", "disabled": true}]);
    assert_eq!(normalize_value(value), json!(["A"]));
}

// ── Properties ───────────────────────────────────────────────────

fn field_value_strategy() -> impl Strategy<Value = Value> {
    let key = "[A-Z_]{1,8}";
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
        Just(Value::Null),
        prop::collection::vec(key, 1..4).prop_map(|keys| {
            Value::Array(
                keys.into_iter()
                    .map(|k| json!({"key": k.clone(), "stringValue": k.to_lowercase()}))
                    .collect(),
            )
        }),
        prop::collection::vec(key, 0..4).prop_map(|keys| json!(keys)),
    ]
}

fn snapshot_strategy() -> impl Strategy<Value = FormSnapshot> {
    prop::collection::vec(("[a-z]{1,6}", field_value_strategy()), 0..8)
        .prop_map(|fields| fields.into_iter().collect())
}

proptest! {
    /// Idempotence: normalize(normalize(s)) == normalize(s)
    #[test]
    fn normalization_is_idempotent(snap in snapshot_strategy()) {
        let once = normalize_enum_selections(snap);
        let twice = normalize_enum_selections(once.clone());
        prop_assert_eq!(twice, once);
    }

    /// Fields without the option-list shape come back unchanged.
    #[test]
    fn non_option_fields_pass_through(snap in snapshot_strategy()) {
        let normalized = normalize_enum_selections(snap.clone());
        prop_assert_eq!(normalized.len(), snap.len());
        for (field, value) in snap.iter() {
            if !is_enum_selection(value) {
                prop_assert_eq!(normalized.get(field), Some(value));
            }
        }
    }
}
