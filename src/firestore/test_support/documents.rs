use crate::firestore::model::{DocumentKey, DocumentRecord, Timestamp};
use crate::firestore::value::{FirestoreValue, MapValue};

pub fn key(path: &str) -> DocumentKey {
    DocumentKey::from_string(path).expect("valid document path")
}

/// Builds a record with a fixed create/update time.
pub fn doc(path: &str, fields: &[(&str, FirestoreValue)]) -> DocumentRecord {
    doc_at(path, fields, 1)
}

/// Builds a record whose update time is `version` seconds after the epoch.
pub fn doc_at(path: &str, fields: &[(&str, FirestoreValue)], version: i64) -> DocumentRecord {
    let fields: MapValue = fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    DocumentRecord::new(
        key(path),
        fields,
        Timestamp::new(1, 0),
        Timestamp::new(version, 0),
    )
}
