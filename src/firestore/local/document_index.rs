use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::firestore::core::DocumentComparator;
use crate::firestore::logger::LOGGER;
use crate::firestore::model::{DocumentKey, DocumentRecord};
use crate::util::assert;

/// A record positioned by the query comparator inside the ordered set.
///
/// Equality is defined through the comparator, which only reports `Equal` for
/// two records sharing a key.
#[derive(Clone)]
struct IndexEntry {
    doc: Arc<DocumentRecord>,
    comparator: Arc<dyn DocumentComparator>,
}

impl IndexEntry {
    fn new(doc: Arc<DocumentRecord>, comparator: &Arc<dyn DocumentComparator>) -> Self {
        Self {
            doc,
            comparator: Arc::clone(comparator),
        }
    }
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparator.compare(&self.doc, &other.doc)
    }
}

/// Query results kept in comparator order, with a key-addressed mirror.
///
/// `ordered` and `by_key` always hold the same keys and share the same `Arc`
/// records. The ordered side can only be searched with the record that was
/// inserted, so removals first resolve the stored record through `by_key`.
pub struct DocumentIndex {
    comparator: Arc<dyn DocumentComparator>,
    ordered: BTreeSet<IndexEntry>,
    by_key: BTreeMap<DocumentKey, Arc<DocumentRecord>>,
}

impl DocumentIndex {
    pub fn new(comparator: Arc<dyn DocumentComparator>) -> Self {
        Self {
            comparator,
            ordered: BTreeSet::new(),
            by_key: BTreeMap::new(),
        }
    }

    pub fn comparator(&self) -> &Arc<dyn DocumentComparator> {
        &self.comparator
    }

    /// Inserts a record whose key is not yet indexed.
    ///
    /// # Panics
    ///
    /// Panics when a record with the same key is already present. Callers that
    /// may replace an existing record use [`DocumentIndex::update`].
    pub fn insert(&mut self, doc: impl Into<Arc<DocumentRecord>>) {
        let doc = doc.into();
        assert(
            !self.by_key.contains_key(doc.key()),
            format!("document {} is already indexed", doc.key()),
        );
        self.by_key.insert(doc.key().clone(), Arc::clone(&doc));
        let inserted = self.ordered.insert(IndexEntry::new(doc, &self.comparator));
        assert(inserted, "ordered index out of sync with key index");
    }

    /// Removes the record stored under `key`, returning it.
    ///
    /// Removing an absent key leaves the index untouched.
    pub fn remove(&mut self, key: &DocumentKey) -> Option<Arc<DocumentRecord>> {
        let Some(existing) = self.by_key.remove(key) else {
            LOGGER.warn(format!("Ignoring removal of unknown document {key}"));
            return None;
        };
        let removed = self
            .ordered
            .remove(&IndexEntry::new(Arc::clone(&existing), &self.comparator));
        assert(removed, "ordered index out of sync with key index");
        Some(existing)
    }

    /// Replaces the record stored under the same key (if any) with `doc`.
    ///
    /// The record is repositioned according to its new field values.
    pub fn update(&mut self, doc: impl Into<Arc<DocumentRecord>>) -> Option<Arc<DocumentRecord>> {
        let doc = doc.into();
        let previous = if self.by_key.contains_key(doc.key()) {
            self.remove(doc.key())
        } else {
            None
        };
        self.insert(doc);
        previous
    }

    /// Loads a batch of records with distinct keys.
    ///
    /// On an empty index the batch is sorted once and the tree is built in a
    /// single pass; otherwise each record is inserted individually.
    ///
    /// # Panics
    ///
    /// Panics on a key that is already indexed or repeated in the batch.
    pub fn bulk_load<I>(&mut self, docs: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<DocumentRecord>>,
    {
        if !self.is_empty() {
            for doc in docs {
                self.insert(doc);
            }
            return;
        }

        let entries: Vec<IndexEntry> = docs
            .into_iter()
            .map(|doc| IndexEntry::new(doc.into(), &self.comparator))
            .collect();
        for entry in &entries {
            let replaced = self
                .by_key
                .insert(entry.doc.key().clone(), Arc::clone(&entry.doc));
            assert(
                replaced.is_none(),
                format!("document {} appears twice in one load", entry.doc.key()),
            );
        }
        self.ordered = entries.into_iter().collect();
    }

    /// Records in comparator order.
    pub fn in_order(&self) -> impl DoubleEndedIterator<Item = &Arc<DocumentRecord>> + '_ {
        self.ordered.iter().map(|entry| &entry.doc)
    }

    /// Keys in ascending key order, independent of the query ordering.
    pub fn keys_in_key_order(&self) -> impl DoubleEndedIterator<Item = &DocumentKey> + '_ {
        self.by_key.keys()
    }

    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn get(&self, key: &DocumentKey) -> Option<&Arc<DocumentRecord>> {
        self.by_key.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn clear(&mut self) {
        self.ordered.clear();
        self.by_key.clear();
    }
}

impl Debug for DocumentIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.in_order().map(|doc| doc.key()))
            .finish()
    }
}
