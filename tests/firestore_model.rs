use firestore_watch::firestore::model::{FieldPath, GeoPoint, ResourcePath};
use firestore_watch::firestore::{DocumentKey, Timestamp};

#[test]
fn resource_paths_index_into_segments() {
    let path = ResourcePath::from_segments(["rooms", "Eros", "messages"]);
    assert_eq!(path.get(0), Some("rooms"));
    assert_eq!(path.get(2), Some("messages"));
    assert_eq!(path.get(3), None);
    assert_eq!(path.last_segment(), Some("messages"));
    assert_eq!(path.without_last(), ResourcePath::from_segments(["rooms", "Eros"]));
}

#[test]
fn resource_paths_parse_and_reject_empty_segments() {
    let path = ResourcePath::from_string("/rooms/Eros/").unwrap();
    assert_eq!(path.canonical_string(), "rooms/Eros");
    assert!(ResourcePath::from_string("").unwrap().is_empty());

    let err = ResourcePath::from_string("rooms//Eros").unwrap_err();
    assert_eq!(err.code_str(), "firestore/invalid-argument");
}

#[test]
fn resource_paths_compare_segment_wise() {
    let parent = ResourcePath::from_segments(["a", "b"]);
    let child = parent.child(["c"]);
    assert!(parent < child);
    assert!(parent.is_prefix_of(&child));
    assert!(ResourcePath::from_segments(["a", "z"]) > child);
    assert!(ResourcePath::from_segments(["a", "b", "a"]) < ResourcePath::from_segments(["a", "ba"]));
}

#[test]
fn document_keys_need_even_paths() {
    let key = DocumentKey::from_string("cities/sf").unwrap();
    assert_eq!(key.id(), "sf");
    assert_eq!(key.collection_path(), ResourcePath::from_segments(["cities"]));
    assert!(DocumentKey::from_string("cities").is_err());
    assert!(DocumentKey::from_string("").is_err());

    let mut keys = vec![
        DocumentKey::from_string("cities/sf/rooms/b").unwrap(),
        DocumentKey::from_string("cities/la").unwrap(),
        DocumentKey::from_string("cities/sf").unwrap(),
    ];
    keys.sort();
    let rendered: Vec<_> = keys.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["cities/la", "cities/sf", "cities/sf/rooms/b"]);
}

#[test]
fn field_paths_identify_document_key() {
    let name = FieldPath::from_dot_separated("__name__").unwrap();
    assert!(name.is_document_id());
    assert_eq!(name, FieldPath::document_id());
    assert!(!FieldPath::from_dot_separated("a.__name__").unwrap().is_document_id());
}

#[test]
fn timestamps_normalize_and_convert() {
    let ts = Timestamp::new(1, 1_500_000_000);
    assert_eq!((ts.seconds(), ts.nanos()), (2, 500_000_000));
    assert!(Timestamp::new(-1, 0) < Timestamp::new(0, 0));

    let parsed = Timestamp::parse_rfc3339("2024-05-01T12:00:00.250Z").unwrap();
    assert_eq!(parsed.nanos(), 250_000_000);
    let datetime = parsed.to_datetime().unwrap();
    assert_eq!(Timestamp::from_datetime(datetime), parsed);
    assert!(Timestamp::parse_rfc3339("yesterday").is_err());
}

#[test]
fn geo_points_validate_ranges() {
    assert!(GeoPoint::new(91.0, 0.0).is_err());
    assert!(GeoPoint::new(0.0, -181.0).is_err());
    let point = GeoPoint::new(37.7, -122.4).unwrap();
    assert_eq!(point.latitude(), 37.7);
}
