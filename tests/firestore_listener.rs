use std::sync::{Arc, Mutex};

use firestore_watch::firestore::error::{invalid_argument, unavailable};
use firestore_watch::firestore::{
    DocumentKey, DocumentRecord, FirestoreResult, FirestoreValue, ListenControl, MapValue,
    QueryInventory, QueryListener, QueryListenerSettings, QuerySnapshot, ResumeToken,
    TargetChangeState, Timestamp, WatchChange, WatchTargetChange,
};
use futures::stream;

fn city(id: &str, population: i64) -> WatchChange {
    let fields: MapValue = [("population".to_string(), FirestoreValue::from_integer(population))]
        .into_iter()
        .collect();
    WatchChange::DocumentChange(DocumentRecord::new(
        DocumentKey::from_string(&format!("cities/{id}")).unwrap(),
        fields,
        Timestamp::new(1, 0),
        Timestamp::new(1, 0),
    ))
}

fn target(state: TargetChangeState, token: &'static [u8], seconds: i64) -> WatchChange {
    WatchTargetChange::new(state)
        .with_resume_token(ResumeToken::from(token))
        .with_read_time(Timestamp::new(seconds, 0))
        .into()
}

fn listener(settings_json: &str) -> (QueryListener, Arc<Mutex<Vec<QuerySnapshot>>>) {
    let settings = QueryListenerSettings::from_json_str(settings_json).unwrap();
    let inventory = Arc::new(QueryInventory::new(settings.order_spec().unwrap()));
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    let listener = QueryListener::new(inventory, settings, move |snapshot| {
        sink.lock().unwrap().push(snapshot);
    });
    (listener, snapshots)
}

fn ids(snapshot: &QuerySnapshot) -> Vec<String> {
    snapshot.iter().map(|doc| doc.id().to_string()).collect()
}

const BY_POPULATION: &str =
    r#"{"targetId": 9, "orderBy": [{"field": "population", "direction": "DESCENDING"}]}"#;

#[tokio::test]
async fn stream_end_requests_restart_with_resume_token() {
    let (listener, snapshots) = listener(BY_POPULATION);
    let messages: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(target(TargetChangeState::Add, b"t0", 1)),
        Ok(city("sf", 870_000)),
        Ok(city("la", 3_900_000)),
        Ok(city("tokyo", 14_000_000)),
        Ok(target(TargetChangeState::Current, b"t1", 2)),
        Ok(WatchChange::DocumentDelete(
            DocumentKey::from_string("cities/la").unwrap(),
        )),
        Ok(target(TargetChangeState::NoChange, b"t2", 3)),
    ];

    let control = listener.run(stream::iter(messages)).await.unwrap();
    assert_eq!(control, ListenControl::Restart);

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(ids(&snapshots[0]), ["tokyo", "la", "sf"]);
    assert_eq!(ids(&snapshots[1]), ["tokyo", "sf"]);
    assert_eq!(snapshots[1].doc_changes().len(), 1);

    let request = listener.resume_request();
    assert_eq!(request.target_id, 9);
    assert_eq!(request.resume_token, Some(ResumeToken::from(b"t2".as_slice())));
    assert_eq!(request.read_time, Some(Timestamp::new(3, 0)));
}

#[tokio::test]
async fn retryable_error_restarts_and_drops_staged_work() {
    let (listener, snapshots) = listener(BY_POPULATION);
    let first: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(city("sf", 870_000)),
        Ok(target(TargetChangeState::Current, b"t1", 2)),
        Ok(city("phantom", 3_900_000)),
        Err(unavailable("connection reset")),
        Ok(city("never", 1)),
    ];

    let control = listener.run(stream::iter(first)).await.unwrap();

    assert_eq!(control, ListenControl::Restart);
    assert_eq!(snapshots.lock().unwrap().len(), 1);
    assert_eq!(listener.inventory().len(), 1);
    assert!(!listener.inventory().has_pending());
    assert_eq!(
        listener.resume_request().resume_token,
        Some(ResumeToken::from(b"t1".as_slice()))
    );

    // The resumed stream never mentions the document staged before the error.
    let second: Vec<FirestoreResult<WatchChange>> =
        vec![Ok(target(TargetChangeState::Current, b"t4", 4))];
    listener.run(stream::iter(second)).await.unwrap();

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(ids(&snapshots[1]), ["sf"]);
    assert!(snapshots[1].doc_changes().is_empty());
}

#[tokio::test]
async fn idle_no_change_advances_resume_token() {
    let (listener, snapshots) = listener(BY_POPULATION);
    let messages: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(city("sf", 870_000)),
        Ok(target(TargetChangeState::Current, b"t1", 1)),
        Ok(target(TargetChangeState::NoChange, b"t2", 2)),
        Ok(target(TargetChangeState::NoChange, b"t3", 3)),
    ];
    listener.run(stream::iter(messages)).await.unwrap();

    assert_eq!(snapshots.lock().unwrap().len(), 1);
    let request = listener.resume_request();
    assert_eq!(request.resume_token, Some(ResumeToken::from(b"t3".as_slice())));
    assert_eq!(request.read_time, Some(Timestamp::new(3, 0)));
}

#[tokio::test]
async fn permanent_error_is_returned() {
    let (listener, _) = listener("{}");
    let messages: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(city("sf", 1)),
        Ok(WatchTargetChange::new(TargetChangeState::Remove)
            .with_cause(invalid_argument("query requires an index"))
            .into()),
    ];

    let err = listener.run(stream::iter(messages)).await.unwrap_err();
    assert_eq!(err.code_str(), "firestore/invalid-argument");
}

#[tokio::test]
async fn stopped_listener_ends_run() {
    let (listener, snapshots) = listener("{}");
    listener.stop();

    let messages: Vec<FirestoreResult<WatchChange>> =
        vec![Ok(city("sf", 1)), Ok(target(TargetChangeState::Current, b"t", 1))];
    let control = listener.run(stream::iter(messages)).await.unwrap();

    assert_eq!(control, ListenControl::Stop);
    assert!(listener.is_stopped());
    assert!(snapshots.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reset_restarts_then_resumes_on_new_stream() {
    let (listener, snapshots) = listener(BY_POPULATION);
    let first: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(city("sf", 870_000)),
        Ok(target(TargetChangeState::Current, b"t1", 1)),
        Ok(city("bogus", 5)),
        Ok(WatchTargetChange::new(TargetChangeState::Reset).into()),
    ];
    assert_eq!(
        listener.run(stream::iter(first)).await.unwrap(),
        ListenControl::Restart
    );

    let second: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(city("la", 3_900_000)),
        Ok(target(TargetChangeState::Current, b"t2", 2)),
    ];
    listener.run(stream::iter(second)).await.unwrap();

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(ids(&snapshots[1]), ["la", "sf"]);
}

#[tokio::test]
async fn no_change_snapshots_can_be_disabled() {
    let (listener, snapshots) = listener(r#"{"snapshotOnNoChange": false}"#);
    let messages: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(city("sf", 1)),
        Ok(target(TargetChangeState::NoChange, b"t1", 1)),
    ];
    listener.run(stream::iter(messages)).await.unwrap();

    assert!(snapshots.lock().unwrap().is_empty());
    assert!(listener.inventory().is_empty());
    assert_eq!(listener.resume_request().resume_token, None);
}
