use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use search_engine::{EngineEvent, EngineHandle, FailureKind, FetchError, SearchBackend};
use serde_json::{json, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(search_logging::initialize_for_tests);
}

/// Answers after a per-query delay and records every query it saw.
#[derive(Default)]
struct ScriptedBackend {
    delays: HashMap<String, Duration>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }
}

#[async_trait::async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, query: &str) -> Result<Value, FetchError> {
        self.seen.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if query == "broken" {
            return Err(FetchError {
                kind: FailureKind::Network,
                message: "connection reset".to_string(),
            });
        }
        Ok(json!({"query_time": 1, "results": [], "total_hits": query.len()}))
    }
}

fn drain(engine: &EngineHandle, wait: Duration) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Some(event) = engine.recv_timeout(wait) {
        events.push(event);
    }
    events
}

#[test]
fn completed_search_is_reported_with_its_tag() {
    init_logging();
    let backend = Arc::new(ScriptedBackend::default());
    let engine = EngineHandle::with_backend(backend.clone()).expect("engine");

    engine.search(7, "cats");
    let event = engine
        .recv_timeout(Duration::from_secs(5))
        .expect("search settles");

    assert_eq!(
        event,
        EngineEvent::SearchCompleted {
            request_id: 7,
            query: "cats".to_string(),
            result: Ok(json!({"query_time": 1, "results": [], "total_hits": 4})),
        }
    );
    assert_eq!(*backend.seen.lock().unwrap(), vec!["cats".to_string()]);
}

#[test]
fn transport_failure_is_reported() {
    init_logging();
    let engine = EngineHandle::with_backend(Arc::new(ScriptedBackend::default())).expect("engine");

    engine.search(1, "broken");
    match engine.recv_timeout(Duration::from_secs(5)) {
        Some(EngineEvent::SearchCompleted {
            request_id, result, ..
        }) => {
            assert_eq!(request_id, 1);
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "network error: connection reset");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn newer_search_cancels_the_one_in_flight() {
    init_logging();
    let backend = Arc::new(ScriptedBackend::default().with_delay("slow", Duration::from_secs(2)));
    let engine = EngineHandle::with_backend(backend.clone()).expect("engine");

    engine.search(1, "slow");
    // Let the slow request reach the backend before superseding it.
    std::thread::sleep(Duration::from_millis(100));
    engine.search(2, "fast");

    let events = drain(&engine, Duration::from_millis(2500));
    let ids: Vec<_> = events
        .iter()
        .map(|EngineEvent::SearchCompleted { request_id, .. }| *request_id)
        .collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(
        *backend.seen.lock().unwrap(),
        vec!["slow".to_string(), "fast".to_string()]
    );
}

#[test]
fn nothing_is_reported_without_searches() {
    init_logging();
    let engine = EngineHandle::with_backend(Arc::new(ScriptedBackend::default())).expect("engine");
    assert!(engine.try_recv().is_none());
    assert!(engine.recv_timeout(Duration::from_millis(50)).is_none());
}
