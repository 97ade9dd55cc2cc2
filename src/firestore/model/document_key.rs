use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::model::ResourcePath;

/// Identity of a document: a resource path with an even number of segments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    path: ResourcePath,
}

impl DocumentKey {
    pub fn from_path(path: ResourcePath) -> FirestoreResult<Self> {
        if path.len() < 2 || path.len() % 2 != 0 {
            return Err(invalid_argument(format!(
                "Document keys must point to a document (even number of segments), got \"{path}\""
            )));
        }
        Ok(Self { path })
    }

    pub fn from_string(path: &str) -> FirestoreResult<Self> {
        Self::from_path(ResourcePath::from_string(path)?)
    }

    pub fn from_segments<I, S>(segments: I) -> FirestoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_path(ResourcePath::from_segments(segments))
    }

    pub fn collection_path(&self) -> ResourcePath {
        self.path.without_last()
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn id(&self) -> &str {
        // from_path guarantees at least two segments.
        self.path.last_segment().unwrap_or_default()
    }
}

impl PartialOrd for DocumentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocumentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        ResourcePath::comparator(&self.path, &other.path)
    }
}

impl Display for DocumentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
