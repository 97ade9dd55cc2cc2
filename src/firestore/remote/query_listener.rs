use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{pin_mut, Stream, StreamExt};

use crate::firestore::api::QuerySnapshot;
use crate::firestore::error::{internal_error, FirestoreResult};
use crate::firestore::local::QueryInventory;
use crate::firestore::logger::LOGGER;
use crate::firestore::model::{ResumeToken, Timestamp};
use crate::firestore::remote::{
    QueryListenerSettings, TargetChangeState, WatchChange, WatchTargetChange,
};

pub type SnapshotCallback = Arc<dyn Fn(QuerySnapshot) + Send + Sync + 'static>;

/// What the owner of the listen stream should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenControl {
    /// Keep reading the current stream.
    Continue,
    /// Reopen the stream with [`QueryListener::resume_request`].
    Restart,
    /// The listener was stopped; drop the stream.
    Stop,
}

/// Parameters for reopening the listen target after a restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenTargetRequest {
    pub target_id: i32,
    pub resume_token: Option<ResumeToken>,
    pub read_time: Option<Timestamp>,
}

#[derive(Default)]
struct ListenerState {
    // Newest token seen on the stream, committed with the next snapshot.
    received_token: Option<ResumeToken>,
    read_time: Option<Timestamp>,
}

/// Feeds a watch stream into a [`QueryInventory`] and emits snapshots.
///
/// Document messages are staged; a `CURRENT` target change (and, when
/// enabled, a `NO_CHANGE` after staged work) commits the batch together
/// with the newest resume token and hands a snapshot to the callback. A
/// `NO_CHANGE` with nothing staged only advances the resume token.
pub struct QueryListener {
    inventory: Arc<QueryInventory>,
    settings: QueryListenerSettings,
    callback: SnapshotCallback,
    state: Mutex<ListenerState>,
    stopped: AtomicBool,
}

impl QueryListener {
    pub fn new<F>(inventory: Arc<QueryInventory>, settings: QueryListenerSettings, callback: F) -> Self
    where
        F: Fn(QuerySnapshot) + Send + Sync + 'static,
    {
        Self {
            inventory,
            settings,
            callback: Arc::new(callback),
            state: Mutex::new(ListenerState::default()),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn inventory(&self) -> &Arc<QueryInventory> {
        &self.inventory
    }

    pub fn settings(&self) -> &QueryListenerSettings {
        &self.settings
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Target parameters for reconnecting after [`ListenControl::Restart`].
    pub fn resume_request(&self) -> ListenTargetRequest {
        ListenTargetRequest {
            target_id: self.settings.target_id,
            resume_token: self.inventory.resume_token(),
            read_time: self.lock().read_time,
        }
    }

    pub fn handle_watch_change(&self, change: WatchChange) -> FirestoreResult<ListenControl> {
        if self.is_stopped() {
            return Ok(ListenControl::Stop);
        }
        match change {
            WatchChange::DocumentChange(doc) => self.inventory.stage_add(doc),
            WatchChange::DocumentDelete(key) | WatchChange::DocumentRemove(key) => {
                self.inventory.stage_delete(key)
            }
            WatchChange::TargetChange(target_change) => {
                return self.handle_target_change(target_change);
            }
        }
        Ok(ListenControl::Continue)
    }

    fn handle_target_change(&self, change: WatchTargetChange) -> FirestoreResult<ListenControl> {
        if let Some(cause) = change.cause {
            return Err(cause);
        }

        match change.state {
            TargetChangeState::Add => Ok(ListenControl::Continue),
            TargetChangeState::Remove => {
                Err(internal_error("Listen target was removed by the backend"))
            }
            TargetChangeState::Reset => Ok(self.restart()),
            TargetChangeState::NoChange => {
                self.record_progress(change.resume_token, change.read_time);
                if !self.inventory.has_pending() {
                    // Nothing staged: the token alone advances.
                    let token = self.lock().received_token.take();
                    self.inventory.commit(token);
                } else if self.settings.snapshot_on_no_change {
                    self.emit_snapshot();
                }
                Ok(ListenControl::Continue)
            }
            TargetChangeState::Current => {
                self.record_progress(change.resume_token, change.read_time);
                self.emit_snapshot();
                Ok(ListenControl::Continue)
            }
        }
    }

    fn record_progress(&self, resume_token: Option<ResumeToken>, read_time: Option<Timestamp>) {
        let mut state = self.lock();
        if resume_token.is_some() {
            state.received_token = resume_token;
        }
        if read_time.is_some() {
            state.read_time = read_time;
        }
    }

    fn emit_snapshot(&self) {
        let (token, read_time) = {
            let mut state = self.lock();
            (state.received_token.take(), state.read_time)
        };
        self.inventory.commit(token);
        let snapshot = self
            .inventory
            .build_snapshot(read_time.unwrap_or_else(Timestamp::now));
        (self.callback)(snapshot);
    }

    // Staged work belongs to the stream being dropped; the resumed stream
    // replays everything after the committed token.
    fn restart(&self) -> ListenControl {
        self.inventory.clear_pending();
        self.lock().received_token = None;
        ListenControl::Restart
    }

    /// Consumes `stream` until it ends, the listener stops or the target must
    /// be reopened.
    ///
    /// Retryable errors end the run with [`ListenControl::Restart`]; any other
    /// error is returned. Every restart discards uncommitted staged work.
    pub async fn run<S>(&self, stream: S) -> FirestoreResult<ListenControl>
    where
        S: Stream<Item = FirestoreResult<WatchChange>>,
    {
        pin_mut!(stream);
        while let Some(message) = stream.next().await {
            if self.is_stopped() {
                return Ok(ListenControl::Stop);
            }
            let outcome = message.and_then(|change| self.handle_watch_change(change));
            match outcome {
                Ok(ListenControl::Continue) => {}
                Ok(ListenControl::Restart) => return Ok(self.restart()),
                Ok(control) => return Ok(control),
                Err(err) if err.is_retryable() => {
                    LOGGER.warn(format!("Restarting listen target {}: {err}", self.settings.target_id));
                    return Ok(self.restart());
                }
                Err(err) => return Err(err),
            }
        }

        if self.is_stopped() {
            Ok(ListenControl::Stop)
        } else {
            LOGGER.warn(format!(
                "Listen stream for target {} ended, restarting",
                self.settings.target_id
            ));
            Ok(self.restart())
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListenerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for QueryListener {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryListener")
            .field("target_id", &self.settings.target_id)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
