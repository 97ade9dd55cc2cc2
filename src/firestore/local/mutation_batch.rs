use std::collections::BTreeMap;
use std::sync::Arc;

use crate::firestore::local::DocumentIndex;
use crate::firestore::logger::LOGGER;
use crate::firestore::model::{DocumentKey, DocumentRecord};

/// Intention recorded for one key, applied at the next commit.
#[derive(Clone, Debug, PartialEq)]
pub enum StagedMutation {
    Upsert(Arc<DocumentRecord>),
    Delete,
}

/// Counts of what a commit did to the index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Deletes staged for keys that were not indexed.
    pub ignored_deletes: usize,
}

impl CommitSummary {
    /// Number of keys whose indexed state changed.
    pub fn changed(&self) -> usize {
        self.added + self.updated + self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.changed() == 0 && self.ignored_deletes == 0
    }
}

/// Accumulates adds and deletes between commits.
///
/// Staging the same key twice keeps only the later operation, so a delete
/// followed by an add recreates the document and an add followed by a delete
/// removes it.
#[derive(Debug, Default)]
pub struct MutationBatcher {
    staged: BTreeMap<DocumentKey, StagedMutation>,
}

impl MutationBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_add(&mut self, doc: impl Into<Arc<DocumentRecord>>) {
        let doc = doc.into();
        self.staged
            .insert(doc.key().clone(), StagedMutation::Upsert(doc));
    }

    pub fn stage_delete(&mut self, key: DocumentKey) {
        self.staged.insert(key, StagedMutation::Delete);
    }

    pub fn has_pending(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn staged(&self, key: &DocumentKey) -> Option<&StagedMutation> {
        self.staged.get(key)
    }

    /// Drops staged work without touching any index.
    pub fn clear(&mut self) {
        self.staged.clear();
    }

    /// Applies every staged mutation to `index` and clears the batch.
    pub fn apply(&mut self, index: &mut DocumentIndex) -> CommitSummary {
        self.apply_with(index, |_| {})
    }

    /// Like [`MutationBatcher::apply`], reporting each key whose indexed
    /// state changed to `touched`.
    pub fn apply_with<F>(&mut self, index: &mut DocumentIndex, mut touched: F) -> CommitSummary
    where
        F: FnMut(&DocumentKey),
    {
        let staged = std::mem::take(&mut self.staged);
        let mut summary = CommitSummary::default();

        if index.is_empty() {
            // Initial load: nothing to delete, build the tree in one pass.
            let mut docs = Vec::with_capacity(staged.len());
            for (key, mutation) in staged {
                match mutation {
                    StagedMutation::Upsert(doc) => {
                        touched(&key);
                        docs.push(doc);
                    }
                    StagedMutation::Delete => {
                        LOGGER.warn(format!("Ignoring staged delete of unknown document {key}"));
                        summary.ignored_deletes += 1;
                    }
                }
            }
            summary.added = docs.len();
            index.bulk_load(docs);
            return summary;
        }

        for (key, mutation) in staged {
            match mutation {
                StagedMutation::Upsert(doc) => {
                    if index.update(doc).is_some() {
                        summary.updated += 1;
                    } else {
                        summary.added += 1;
                    }
                    touched(&key);
                }
                StagedMutation::Delete => {
                    if index.contains(&key) {
                        index.remove(&key);
                        summary.deleted += 1;
                        touched(&key);
                    } else {
                        LOGGER.warn(format!("Ignoring staged delete of unknown document {key}"));
                        summary.ignored_deletes += 1;
                    }
                }
            }
        }
        summary
    }
}
