use crate::firestore::model::{DocumentKey, FieldPath, Timestamp};
use crate::firestore::value::{FirestoreValue, MapValue};

/// The materialized value of a document at one point in time.
///
/// Records are immutable: an update from the watch stream produces a new
/// record that replaces the previous one wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentRecord {
    key: DocumentKey,
    fields: MapValue,
    create_time: Timestamp,
    update_time: Timestamp,
}

impl DocumentRecord {
    pub fn new(
        key: DocumentKey,
        fields: MapValue,
        create_time: Timestamp,
        update_time: Timestamp,
    ) -> Self {
        Self {
            key,
            fields,
            create_time,
            update_time,
        }
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn id(&self) -> &str {
        self.key.id()
    }

    pub fn fields(&self) -> &MapValue {
        &self.fields
    }

    /// Value stored at `path`, or `None` when the field is absent.
    ///
    /// `__name__` is not a stored field; callers ordering by document id use
    /// [`DocumentRecord::key`].
    pub fn field(&self, path: &FieldPath) -> Option<&FirestoreValue> {
        self.fields.get(path)
    }

    pub fn create_time(&self) -> Timestamp {
        self.create_time
    }

    pub fn update_time(&self) -> Timestamp {
        self.update_time
    }
}
