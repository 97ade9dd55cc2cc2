//! Incrementally maintained query results fed by a Firestore watch stream.
//!
//! A [`QueryInventory`] keeps the documents matching one query ordered by the
//! query's `order_by` clauses. Document changes are staged and committed in
//! batches, and each commit point can produce an immutable [`QuerySnapshot`]
//! together with the changes since the previous one. [`QueryListener`] drives
//! an inventory from a stream of decoded [`WatchChange`] messages.

pub mod api;
pub mod constants;
pub mod core;
pub mod error;
pub mod local;
pub mod logger;
pub mod model;
pub mod remote;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{diff, DocumentChange, DocumentChangeType, QuerySnapshot, SnapshotDiff};
pub use self::core::{DocumentComparator, OrderBy, OrderDirection, OrderSpec, QueryComparator};
pub use error::{FirestoreError, FirestoreErrorCode, FirestoreResult};
pub use local::{CommitSummary, DocumentIndex, MutationBatcher, QueryInventory, SnapshotBuilder};
pub use model::{DocumentKey, DocumentRecord, FieldPath, ResumeToken, Timestamp};
pub use remote::{
    ListenControl, ListenTargetRequest, QueryListener, QueryListenerSettings, TargetChangeState,
    WatchChange, WatchTargetChange,
};
pub use value::{FirestoreValue, MapValue};
