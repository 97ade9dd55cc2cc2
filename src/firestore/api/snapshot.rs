use std::cmp::Ordering;
use std::sync::Arc;

use crate::firestore::core::documents_equal;
use crate::firestore::model::{DocumentKey, DocumentRecord, ResumeToken, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentChangeType {
    Added,
    Modified,
    Removed,
}

/// One document's change between two consecutive snapshots of a query.
///
/// `old_index` is the position in the previous snapshot and `new_index` the
/// position in the snapshot carrying the change; additions have no old
/// position and removals no new one.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentChange {
    change_type: DocumentChangeType,
    doc: Arc<DocumentRecord>,
    old_index: Option<usize>,
    new_index: Option<usize>,
}

impl DocumentChange {
    pub(crate) fn new(
        change_type: DocumentChangeType,
        doc: Arc<DocumentRecord>,
        old_index: Option<usize>,
        new_index: Option<usize>,
    ) -> Self {
        Self {
            change_type,
            doc,
            old_index,
            new_index,
        }
    }

    pub fn change_type(&self) -> DocumentChangeType {
        self.change_type
    }

    pub fn doc(&self) -> &Arc<DocumentRecord> {
        &self.doc
    }

    pub fn old_index(&self) -> Option<usize> {
        self.old_index
    }

    pub fn new_index(&self) -> Option<usize> {
        self.new_index
    }
}

/// An immutable, ordered view of a query's results at `read_time`.
///
/// Besides the documents in query order, a snapshot keeps their positions
/// sorted by key so that two snapshots can be compared in linear time.
#[derive(Clone, Debug)]
pub struct QuerySnapshot {
    documents: Vec<Arc<DocumentRecord>>,
    key_order: Vec<usize>,
    read_time: Timestamp,
    resume_token: Option<ResumeToken>,
    changes: Vec<DocumentChange>,
}

impl QuerySnapshot {
    /// Wraps documents that are already in query order.
    pub fn from_documents(documents: Vec<Arc<DocumentRecord>>, read_time: Timestamp) -> Self {
        let mut key_order: Vec<usize> = (0..documents.len()).collect();
        key_order.sort_by(|&left, &right| documents[left].key().cmp(documents[right].key()));
        Self {
            documents,
            key_order,
            read_time,
            resume_token: None,
            changes: Vec::new(),
        }
    }

    /// Wraps documents in query order together with their positions in
    /// ascending key order, as produced by an index walk.
    pub(crate) fn from_ordered_parts(
        documents: Vec<Arc<DocumentRecord>>,
        key_order: Vec<usize>,
        read_time: Timestamp,
    ) -> Self {
        debug_assert_eq!(documents.len(), key_order.len());
        Self {
            documents,
            key_order,
            read_time,
            resume_token: None,
            changes: Vec::new(),
        }
    }

    pub fn empty(read_time: Timestamp) -> Self {
        Self::from_documents(Vec::new(), read_time)
    }

    pub(crate) fn with_resume_token(mut self, resume_token: Option<ResumeToken>) -> Self {
        self.resume_token = resume_token;
        self
    }

    pub(crate) fn with_changes(mut self, changes: Vec<DocumentChange>) -> Self {
        self.changes = changes;
        self
    }

    pub fn documents(&self) -> &[Arc<DocumentRecord>] {
        &self.documents
    }

    pub fn get(&self, position: usize) -> Option<&Arc<DocumentRecord>> {
        self.documents.get(position)
    }

    /// Position of the document stored under `key`.
    pub fn position_of(&self, key: &DocumentKey) -> Option<usize> {
        self.key_order
            .binary_search_by(|&position| self.documents[position].key().cmp(key))
            .ok()
            .map(|found| self.key_order[found])
    }

    /// Documents in ascending key order.
    pub fn iter_by_key(&self) -> impl Iterator<Item = &Arc<DocumentRecord>> + '_ {
        self.key_order.iter().map(|&position| &self.documents[position])
    }

    pub(crate) fn positions_by_key(
        &self,
    ) -> impl Iterator<Item = (usize, &Arc<DocumentRecord>)> + '_ {
        self.key_order
            .iter()
            .map(|&position| (position, &self.documents[position]))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<DocumentRecord>> {
        self.documents.iter()
    }

    pub fn read_time(&self) -> Timestamp {
        self.read_time
    }

    /// Resume token committed when the snapshot was built.
    pub fn resume_token(&self) -> Option<&ResumeToken> {
        self.resume_token.as_ref()
    }

    /// Changes relative to the previous snapshot built by the same inventory.
    pub fn doc_changes(&self) -> &[DocumentChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_documents(self) -> Vec<Arc<DocumentRecord>> {
        self.documents
    }
}

impl<'a> IntoIterator for &'a QuerySnapshot {
    type Item = &'a Arc<DocumentRecord>;
    type IntoIter = std::slice::Iter<'a, Arc<DocumentRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

impl IntoIterator for QuerySnapshot {
    type Item = Arc<DocumentRecord>;
    type IntoIter = std::vec::IntoIter<Arc<DocumentRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// Documents that differ between two snapshots, each list in key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotDiff {
    pub added: Vec<Arc<DocumentRecord>>,
    pub removed: Vec<Arc<DocumentRecord>>,
    /// New versions of documents present in both snapshots with different content.
    pub modified: Vec<Arc<DocumentRecord>>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compares two snapshots by document key in a single merge walk.
pub fn diff(previous: &QuerySnapshot, current: &QuerySnapshot) -> SnapshotDiff {
    let mut result = SnapshotDiff::default();
    let mut old = previous.iter_by_key().peekable();
    let mut new = current.iter_by_key().peekable();

    loop {
        let ordering = match (old.peek(), new.peek()) {
            (Some(before), Some(after)) => before.key().cmp(after.key()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match ordering {
            Ordering::Less => {
                if let Some(before) = old.next() {
                    result.removed.push(Arc::clone(before));
                }
            }
            Ordering::Greater => {
                if let Some(after) = new.next() {
                    result.added.push(Arc::clone(after));
                }
            }
            Ordering::Equal => {
                if let (Some(before), Some(after)) = (old.next(), new.next()) {
                    if !documents_equal(before, after) {
                        result.modified.push(Arc::clone(after));
                    }
                }
            }
        }
    }
    result
}
