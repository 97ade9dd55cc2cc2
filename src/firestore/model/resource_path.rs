use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use crate::firestore::error::{invalid_argument, FirestoreResult};

/// Slash-separated path into the Firestore resource hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(segments.into_iter().map(Into::into).collect())
    }

    pub fn from_string(path: &str) -> FirestoreResult<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.trim().is_empty() {
            return Ok(Self::root());
        }
        if trimmed.split('/').any(str::is_empty) {
            return Err(invalid_argument(format!(
                "Found empty segment in resource path \"{path}\""
            )));
        }
        Ok(Self::from_segments(trimmed.split('/')))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn child<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut child = self.segments.clone();
        child.extend(segments.into_iter().map(Into::into));
        Self::new(child)
    }

    pub fn without_last(&self) -> Self {
        match self.segments.split_last() {
            Some((_, rest)) => Self::new(rest.to_vec()),
            None => Self::root(),
        }
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn canonical_string(&self) -> String {
        self.segments.join("/")
    }

    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.len() <= other.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(l, r)| l == r)
    }

    /// Segment-wise lexicographic order; a strict prefix sorts first.
    pub fn comparator(left: &Self, right: &Self) -> Ordering {
        for (l, r) in left.segments.iter().zip(right.segments.iter()) {
            match l.cmp(r) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }
        left.len().cmp(&right.len())
    }
}

impl PartialOrd for ResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResourcePath {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::comparator(self, other)
    }
}

impl Display for ResourcePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}

impl Deref for ResourcePath {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.segments
    }
}
