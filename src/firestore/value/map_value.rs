use std::collections::BTreeMap;

use crate::firestore::model::FieldPath;
use crate::firestore::value::{FirestoreValue, ValueKind};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapValue {
    fields: BTreeMap<String, FirestoreValue>,
}

impl MapValue {
    pub fn new(fields: BTreeMap<String, FirestoreValue>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &BTreeMap<String, FirestoreValue> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolves a dotted field path, descending through nested maps.
    pub fn get(&self, path: &FieldPath) -> Option<&FirestoreValue> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.fields.get(first)?;
        for segment in rest {
            match current.kind() {
                ValueKind::Map(child) => current = child.fields.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

impl FromIterator<(String, FirestoreValue)> for MapValue {
    fn from_iter<T: IntoIterator<Item = (String, FirestoreValue)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
