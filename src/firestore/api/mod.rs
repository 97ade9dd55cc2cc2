mod snapshot;

pub use snapshot::{diff, DocumentChange, DocumentChangeType, QuerySnapshot, SnapshotDiff};
