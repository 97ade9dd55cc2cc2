use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::firestore::api::{DocumentChange, DocumentChangeType, QuerySnapshot};
use crate::firestore::core::documents_equal;
use crate::firestore::local::DocumentIndex;
use crate::firestore::model::{DocumentKey, DocumentRecord, ResumeToken, Timestamp};

/// Materializes snapshots of a [`DocumentIndex`] and the changes between them.
///
/// Only keys reported through [`SnapshotBuilder::touch`] since the previous
/// snapshot are examined for changes, so a snapshot after a small commit does
/// not compare the whole result set.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    previous: BTreeMap<DocumentKey, (usize, Arc<DocumentRecord>)>,
    touched: BTreeSet<DocumentKey>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as changed in the index since the last snapshot.
    pub fn touch(&mut self, key: &DocumentKey) {
        if !self.touched.contains(key) {
            self.touched.insert(key.clone());
        }
    }

    pub fn has_touched(&self) -> bool {
        !self.touched.is_empty()
    }

    pub fn build_snapshot(
        &mut self,
        index: &DocumentIndex,
        read_time: Timestamp,
        resume_token: Option<ResumeToken>,
    ) -> QuerySnapshot {
        let documents: Vec<Arc<DocumentRecord>> = index.in_order().cloned().collect();
        let positions: HashMap<&DocumentKey, usize> = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| (doc.key(), position))
            .collect();
        // The index already keeps its keys sorted; no re-sort per snapshot.
        let key_order: Vec<usize> = index
            .keys_in_key_order()
            .filter_map(|key| positions.get(key).copied())
            .collect();
        let snapshot = QuerySnapshot::from_ordered_parts(documents, key_order, read_time);
        let changes = self.changes_since_previous(&snapshot);

        self.previous = snapshot
            .positions_by_key()
            .map(|(position, doc)| (doc.key().clone(), (position, Arc::clone(doc))))
            .collect();

        snapshot
            .with_resume_token(resume_token)
            .with_changes(changes)
    }

    /// Forgets the previous snapshot; the next one reports every document as added.
    pub fn reset(&mut self) {
        self.previous.clear();
        self.touched.clear();
    }

    fn changes_since_previous(&mut self, snapshot: &QuerySnapshot) -> Vec<DocumentChange> {
        let mut removed = Vec::new();
        let mut changed = Vec::new();

        for key in std::mem::take(&mut self.touched) {
            let before = self.previous.get(&key);
            let after = snapshot
                .position_of(&key)
                .and_then(|position| snapshot.get(position).map(|doc| (position, doc)));

            match (before, after) {
                (Some((old_index, old_doc)), None) => removed.push(DocumentChange::new(
                    DocumentChangeType::Removed,
                    Arc::clone(old_doc),
                    Some(*old_index),
                    None,
                )),
                (None, Some((new_index, new_doc))) => changed.push(DocumentChange::new(
                    DocumentChangeType::Added,
                    Arc::clone(new_doc),
                    None,
                    Some(new_index),
                )),
                (Some((old_index, old_doc)), Some((new_index, new_doc))) => {
                    if !documents_equal(old_doc, new_doc) {
                        changed.push(DocumentChange::new(
                            DocumentChangeType::Modified,
                            Arc::clone(new_doc),
                            Some(*old_index),
                            Some(new_index),
                        ));
                    }
                }
                (None, None) => {}
            }
        }

        removed.sort_by_key(|change| change.old_index());
        changed.sort_by_key(|change| change.new_index());
        removed.extend(changed);
        removed
    }
}
