use crate::firestore::error::FirestoreError;
use crate::firestore::model::{DocumentKey, DocumentRecord, ResumeToken, Timestamp};

/// One message of the listen (watch) stream, already decoded.
#[derive(Debug, Clone)]
pub enum WatchChange {
    TargetChange(WatchTargetChange),
    /// A document entered the result set or changed.
    DocumentChange(DocumentRecord),
    /// A document was deleted.
    DocumentDelete(DocumentKey),
    /// A document stopped matching the query.
    DocumentRemove(DocumentKey),
}

#[derive(Debug, Clone)]
pub struct WatchTargetChange {
    pub state: TargetChangeState,
    pub resume_token: Option<ResumeToken>,
    pub read_time: Option<Timestamp>,
    pub cause: Option<FirestoreError>,
}

impl WatchTargetChange {
    pub fn new(state: TargetChangeState) -> Self {
        Self {
            state,
            resume_token: None,
            read_time: None,
            cause: None,
        }
    }

    pub fn with_resume_token(mut self, resume_token: ResumeToken) -> Self {
        self.resume_token = Some(resume_token);
        self
    }

    pub fn with_read_time(mut self, read_time: Timestamp) -> Self {
        self.read_time = Some(read_time);
        self
    }

    pub fn with_cause(mut self, cause: FirestoreError) -> Self {
        self.cause = Some(cause);
        self
    }
}

impl From<WatchTargetChange> for WatchChange {
    fn from(value: WatchTargetChange) -> Self {
        WatchChange::TargetChange(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChangeState {
    NoChange,
    Add,
    Remove,
    Current,
    Reset,
}
