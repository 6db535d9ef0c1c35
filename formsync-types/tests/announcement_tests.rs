use formsync_types::{EntityId, Timestamp, UpdateAnnouncement};
use proptest::prelude::*;

#[test]
fn wire_format_is_id_and_ts_only() {
    let ann = UpdateAnnouncement::new(EntityId::new(42), Timestamp::from_millis(1_000));
    assert_eq!(ann.to_json().unwrap(), r#"{"id":42,"ts":1000}"#);
}

#[test]
fn decodes_foreign_message() {
    let ann = UpdateAnnouncement::from_json(r#"{"ts": 5, "id": 7}"#).unwrap();
    assert_eq!(ann.id, EntityId::new(7));
    assert_eq!(ann.ts, Timestamp::from_millis(5));
}

#[test]
fn rejects_missing_fields() {
    assert!(UpdateAnnouncement::from_json(r#"{"id": 7}"#).is_err());
}

#[test]
fn now_stamps_current_time() {
    let before = Timestamp::now();
    let ann = UpdateAnnouncement::now(EntityId::new(1));
    let after = Timestamp::now();
    assert!(before <= ann.ts && ann.ts <= after);
    assert!(ann.is_for(EntityId::new(1)));
    assert!(!ann.is_for(EntityId::new(2)));
}

proptest! {
    #[test]
    fn wire_roundtrip(id in any::<i64>(), ts in any::<u64>()) {
        let ann = UpdateAnnouncement::new(EntityId::new(id), Timestamp::from_millis(ts));
        let back = UpdateAnnouncement::from_json(&ann.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, ann);
    }
}
