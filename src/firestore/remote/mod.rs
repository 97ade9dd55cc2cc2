mod query_listener;
mod settings;
mod watch_change;

pub use query_listener::{ListenControl, ListenTargetRequest, QueryListener, SnapshotCallback};
pub use settings::{OrderByConfig, QueryListenerSettings};
pub use watch_change::{TargetChangeState, WatchChange, WatchTargetChange};
