use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::firestore::api::QuerySnapshot;
use crate::firestore::core::{DocumentComparator, OrderBy, OrderDirection, OrderSpec, QueryComparator};
use crate::firestore::error::FirestoreResult;
use crate::firestore::local::{CommitSummary, DocumentIndex, MutationBatcher, SnapshotBuilder};
use crate::firestore::logger::LOGGER;
use crate::firestore::model::{DocumentKey, DocumentRecord, IntoFieldPath, ResumeToken, Timestamp};

struct InventoryState {
    index: DocumentIndex,
    batcher: MutationBatcher,
    snapshots: SnapshotBuilder,
    resume_token: Option<ResumeToken>,
}

impl InventoryState {
    fn commit(&mut self) -> CommitSummary {
        let InventoryState {
            index,
            batcher,
            snapshots,
            ..
        } = self;
        batcher.apply_with(index, |key| snapshots.touch(key))
    }
}

/// Live, ordered results of one query subscription.
///
/// The stream consumer stages adds and deletes and commits them in batches;
/// any thread may build snapshots. Every call holds the internal lock only
/// for its own duration.
pub struct QueryInventory {
    order_spec: OrderSpec,
    comparator: Arc<QueryComparator>,
    state: Mutex<InventoryState>,
}

impl QueryInventory {
    pub fn new(order_spec: OrderSpec) -> Self {
        let comparator = Arc::new(QueryComparator::new(&order_spec));
        let index_comparator: Arc<dyn DocumentComparator> = comparator.clone();
        Self {
            order_spec,
            comparator,
            state: Mutex::new(InventoryState {
                index: DocumentIndex::new(index_comparator),
                batcher: MutationBatcher::new(),
                snapshots: SnapshotBuilder::new(),
                resume_token: None,
            }),
        }
    }

    /// Builds an inventory from raw `(field, direction)` clauses.
    ///
    /// Fails with `invalid-argument` when a field path is malformed, a field
    /// is ordered twice or `__name__` is not the last clause.
    pub fn from_order_by<I, F>(clauses: I) -> FirestoreResult<Self>
    where
        I: IntoIterator<Item = (F, OrderDirection)>,
        F: IntoFieldPath,
    {
        let clauses = clauses
            .into_iter()
            .map(|(field, direction)| Ok(OrderBy::new(field.into_field_path()?, direction)))
            .collect::<FirestoreResult<Vec<_>>>()?;
        Ok(Self::new(OrderSpec::new(clauses)?))
    }

    pub fn order_spec(&self) -> &OrderSpec {
        &self.order_spec
    }

    /// Comparator ordering the results; exposes the comparison counter.
    pub fn comparator(&self) -> &Arc<QueryComparator> {
        &self.comparator
    }

    pub fn stage_add(&self, doc: impl Into<Arc<DocumentRecord>>) {
        self.lock().batcher.stage_add(doc);
    }

    pub fn stage_delete(&self, key: DocumentKey) {
        self.lock().batcher.stage_delete(key);
    }

    pub fn has_pending(&self) -> bool {
        self.lock().batcher.has_pending()
    }

    pub fn clear_pending(&self) {
        self.lock().batcher.clear();
    }

    /// Applies staged mutations and records `resume_token` when given.
    pub fn commit(&self, resume_token: Option<ResumeToken>) -> CommitSummary {
        let mut state = self.lock();
        let summary = state.commit();
        if let Some(token) = resume_token {
            state.resume_token = Some(token);
        }
        if !summary.is_empty() {
            LOGGER.debug(format!(
                "Committed {} added, {} updated, {} deleted, {} ignored deletes ({} documents)",
                summary.added,
                summary.updated,
                summary.deleted,
                summary.ignored_deletes,
                state.index.len()
            ));
        }
        summary
    }

    /// Latest resume token recorded by [`QueryInventory::commit`].
    pub fn resume_token(&self) -> Option<ResumeToken> {
        self.lock().resume_token.clone()
    }

    /// Snapshot of the committed documents; staged work is not included.
    pub fn build_snapshot(&self, read_time: Timestamp) -> QuerySnapshot {
        let mut state = self.lock();
        let InventoryState {
            index,
            snapshots,
            resume_token,
            ..
        } = &mut *state;
        snapshots.build_snapshot(index, read_time, resume_token.clone())
    }

    /// Commits staged work, then builds a snapshot, under one lock.
    pub fn to_query_snapshot(&self, read_time: Timestamp) -> QuerySnapshot {
        let mut state = self.lock();
        state.commit();
        let InventoryState {
            index,
            snapshots,
            resume_token,
            ..
        } = &mut *state;
        snapshots.build_snapshot(index, read_time, resume_token.clone())
    }

    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.lock().index.contains(key)
    }

    pub fn get(&self, key: &DocumentKey) -> Option<Arc<DocumentRecord>> {
        self.lock().index.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().index.is_empty()
    }

    /// Drops documents, staged work, the resume token and change tracking.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.index.clear();
        state.batcher.clear();
        state.snapshots.reset();
        state.resume_token = None;
    }

    fn lock(&self) -> MutexGuard<'_, InventoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
