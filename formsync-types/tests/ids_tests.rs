use formsync_types::EntityId;
use std::collections::HashSet;
use std::str::FromStr;

// ── EntityId ──────────────────────────────────────────────────────

#[test]
fn entity_id_wraps_raw_value() {
    let id = EntityId::new(42);
    assert_eq!(id.get(), 42);
    assert_eq!(i64::from(id), 42);
    assert_eq!(EntityId::from(42), id);
}

#[test]
fn entity_id_display_and_parse() {
    let id = EntityId::new(1234);
    let s = id.to_string();
    assert_eq!(s, "1234");
    assert_eq!(EntityId::parse(&s).unwrap(), id);
}

#[test]
fn entity_id_parse_trims_whitespace() {
    assert_eq!(EntityId::parse(" 7 ").unwrap(), EntityId::new(7));
}

#[test]
fn entity_id_from_str() {
    let parsed: EntityId = EntityId::from_str("-3").unwrap();
    assert_eq!(parsed.get(), -3);
}

#[test]
fn entity_id_parse_invalid() {
    assert!(EntityId::parse("not-a-number").is_err());
    assert!(EntityId::from_str("").is_err());
}

#[test]
fn entity_id_hash_and_eq() {
    let id = EntityId::new(9);
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id); // duplicate
    set.insert(EntityId::new(10));
    assert_eq!(set.len(), 2);
}

#[test]
fn entity_id_serializes_as_bare_integer() {
    let json = serde_json::to_string(&EntityId::new(77)).unwrap();
    assert_eq!(json, "77");
    let back: EntityId = serde_json::from_str("77").unwrap();
    assert_eq!(back, EntityId::new(77));
}

#[test]
fn entity_id_ordering() {
    assert!(EntityId::new(1) < EntityId::new(2));
}
