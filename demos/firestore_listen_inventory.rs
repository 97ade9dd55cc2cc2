use std::sync::Arc;

use firestore_watch::firestore::logger::{
    set_log_level, set_user_log_handler, LogCallback, LogCallbackParams, LogLevel,
};
use firestore_watch::firestore::{
    DocumentKey, DocumentRecord, FirestoreResult, FirestoreValue, ListenControl, MapValue,
    QueryInventory, QueryListener, QueryListenerSettings, ResumeToken, TargetChangeState,
    Timestamp, WatchChange, WatchTargetChange,
};
use futures::stream;

fn city(id: &str, name: &str, population: i64) -> WatchChange {
    let fields: MapValue = [
        ("name".to_string(), FirestoreValue::from_string(name)),
        ("population".to_string(), FirestoreValue::from_integer(population)),
    ]
    .into_iter()
    .collect();
    let key = DocumentKey::from_string(&format!("cities/{id}")).expect("valid key");
    WatchChange::DocumentChange(DocumentRecord::new(
        key,
        fields,
        Timestamp::new(1, 0),
        Timestamp::now(),
    ))
}

fn current(token: &'static [u8]) -> WatchChange {
    WatchTargetChange::new(TargetChangeState::Current)
        .with_resume_token(ResumeToken::from(token))
        .with_read_time(Timestamp::now())
        .into()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    set_log_level(LogLevel::Debug)?;
    let print_logs: LogCallback = Arc::new(|params: LogCallbackParams| {
        eprintln!("[{}] {}: {}", params.level, params.logger_type, params.message);
    });
    set_user_log_handler(Some(print_logs), None);

    let settings = QueryListenerSettings::from_json_str(
        r#"{"orderBy": [{"field": "population", "direction": "DESCENDING"}]}"#,
    )?;
    let inventory = Arc::new(QueryInventory::new(settings.order_spec()?));
    let listener = QueryListener::new(Arc::clone(&inventory), settings, |snapshot| {
        println!("snapshot at {} ({} documents)", snapshot.read_time(), snapshot.len());
        for change in snapshot.doc_changes() {
            println!("  {:?} {}", change.change_type(), change.doc().key());
        }
        for doc in &snapshot {
            println!("  - {}", doc.id());
        }
    });

    // A recorded listen stream; a real transport would decode these from the wire.
    let messages: Vec<FirestoreResult<WatchChange>> = vec![
        Ok(WatchTargetChange::new(TargetChangeState::Add).into()),
        Ok(city("sf", "San Francisco", 870_000)),
        Ok(city("la", "Los Angeles", 3_900_000)),
        Ok(city("tok", "Tokyo", 14_000_000)),
        Ok(current(b"token-1")),
        Ok(WatchChange::DocumentDelete(DocumentKey::from_string("cities/la")?)),
        Ok(city("sf", "San Francisco", 20_000_000)),
        Ok(current(b"token-2")),
    ];

    match listener.run(stream::iter(messages)).await? {
        ListenControl::Restart => {
            let request = listener.resume_request();
            println!(
                "stream ended, would reopen target {} with token {:?}",
                request.target_id, request.resume_token
            );
        }
        control => println!("listener finished: {control:?}"),
    }
    Ok(())
}
