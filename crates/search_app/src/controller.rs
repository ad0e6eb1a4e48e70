use std::time::{Duration, Instant};

use search_core::{
    initial_query, update, AppState, Effect, FetchState, Msg, PageLocation, SearchViewModel,
    QUERY_PARAM,
};
use search_engine::{EngineEvent, EngineHandle};
use search_logging::{search_debug, search_info};

/// Owns the query state and runs its effects against the page location and the engine.
pub struct SearchController<L: PageLocation> {
    state: AppState,
    location: L,
    engine: EngineHandle,
}

impl<L: PageLocation> SearchController<L> {
    pub fn new(location: L, engine: EngineHandle) -> Self {
        Self {
            state: AppState::new(),
            location,
            engine,
        }
    }

    /// Prime the controller from the page location's `q` parameter.
    pub fn mount(&mut self) {
        let initial_query = initial_query(&self.location);
        search_info!("mounted at {} initial_query={:?}", self.location.href(), initial_query);
        self.dispatch(Msg::PageLoaded { initial_query });
    }

    pub fn input_changed(&mut self, raw: &str) {
        self.dispatch(Msg::InputChanged(raw.to_string()));
    }

    /// Form submission: mirror `raw` into the input and submit it.
    pub fn submit(&mut self, raw: &str) {
        self.input_changed(raw);
        self.dispatch(Msg::QuerySubmitted);
    }

    /// Wait up to `timeout` for engine events and apply everything available.
    /// Returns whether any event arrived.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        let Some(first) = self.engine.recv_timeout(timeout) else {
            return false;
        };
        self.apply_engine_event(first);
        while let Some(event) = self.engine.try_recv() {
            self.apply_engine_event(event);
        }
        true
    }

    /// Pump until the current search settles or `timeout` elapses.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_loading() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.pump(deadline - now);
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state.fetch_state(), FetchState::Loading)
    }

    pub fn view(&self) -> SearchViewModel {
        self.state.view()
    }

    pub fn fetch_state(&self) -> &FetchState {
        self.state.fetch_state()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ReplaceLocationQuery { query } => {
                    self.location.replace_query_param(QUERY_PARAM, &query);
                    search_debug!("location replaced with {}", self.location.href());
                }
                Effect::IssueSearch { request_id, query } => {
                    search_info!("IssueSearch request_id={} query={:?}", request_id, query);
                    self.engine.search(request_id, query);
                }
            }
        }
    }

    fn apply_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::SearchCompleted {
                request_id,
                query,
                result,
            } => {
                if !self.state.is_current_request(request_id) {
                    search_debug!(
                        "discarding stale result request_id={} query={:?}",
                        request_id,
                        query
                    );
                }
                self.dispatch(Msg::SearchSettled {
                    request_id,
                    result: result.map_err(|err| err.to_string()),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, Once};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use search_core::{FetchState, MemoryLocation, PageLocation, RenderMode, QUERY_PARAM};
    use search_engine::{EngineHandle, FailureKind, FetchError, SearchBackend};
    use serde_json::{json, Value};

    use super::SearchController;

    const SETTLE: Duration = Duration::from_secs(5);

    fn init_logging() {
        static INIT: Once = Once::new();
        INIT.call_once(search_logging::initialize_for_tests);
    }

    /// Fake search API: "slow" answers late, "down" fails, everything else
    /// returns three hits named after the query.
    #[derive(Default)]
    struct FakeApi {
        requests: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SearchBackend for FakeApi {
        async fn search(&self, query: &str) -> Result<Value, FetchError> {
            self.requests.lock().unwrap().push(query.to_string());
            match query {
                "slow" => tokio::time::sleep(Duration::from_millis(400)).await,
                "down" => {
                    return Err(FetchError {
                        kind: FailureKind::Network,
                        message: "connection refused".to_string(),
                    })
                }
                _ => {}
            }
            Ok(json!({
                "query_time": 0.25,
                "results": [
                    {"url": format!("https://{query}/1"), "title": format!("{query} 1"), "score": 3.0, "keywords": [query, "one"]},
                    {"url": format!("https://{query}/2"), "title": format!("{query} 2"), "score": 2.0, "keywords": [query]},
                    {"url": format!("https://{query}/3"), "title": format!("{query} 3"), "score": 1.0, "keywords": []}
                ],
                "total_hits": 3
            }))
        }
    }

    fn controller(page_url: &str) -> (SearchController<MemoryLocation>, Arc<FakeApi>) {
        init_logging();
        let api = Arc::new(FakeApi::default());
        let engine = EngineHandle::with_backend(api.clone()).expect("engine");
        let location = MemoryLocation::parse(page_url).expect("page url");
        (SearchController::new(location, engine), api)
    }

    #[test]
    fn shared_url_reproduces_search_on_mount() {
        let (mut controller, api) = controller("http://localhost:4321/swap/?q=cats");
        controller.mount();

        assert!(controller.is_loading());
        assert_eq!(controller.view().input_text, "cats");
        assert!(controller.wait_until_settled(SETTLE));

        let view = controller.view();
        assert_eq!(view.mode, RenderMode::Results);
        assert_eq!(view.total_hits, 3);
        let titles: Vec<_> = view.results.iter().map(|hit| hit.title.clone()).collect();
        assert_eq!(titles, vec!["cats 1", "cats 2", "cats 3"]);
        assert_eq!(api.requests(), vec!["cats".to_string()]);
        // Mount does not rewrite the location.
        assert_eq!(controller.location().href(), "http://localhost:4321/swap/?q=cats");
    }

    #[test]
    fn whitespace_submit_changes_nothing() {
        let (mut controller, api) = controller("http://localhost:4321/swap/");
        controller.mount();
        let href_before = controller.location().href();

        controller.submit("   ");

        assert_eq!(controller.fetch_state(), &FetchState::Idle);
        assert_eq!(controller.location().href(), href_before);
        assert!(!controller.pump(Duration::from_millis(100)));
        assert!(api.requests().is_empty());
    }

    #[test]
    fn submit_writes_trimmed_query_in_place() {
        let (mut controller, api) = controller("http://localhost:4321/swap/?lang=en");
        controller.mount();

        controller.submit("  big cats  ");

        assert_eq!(
            controller.location().query_param(QUERY_PARAM).as_deref(),
            Some("big cats")
        );
        assert_eq!(controller.location().current().path(), "/swap/");
        assert_eq!(
            controller.location().query_param("lang").as_deref(),
            Some("en")
        );
        assert!(controller.wait_until_settled(SETTLE));
        assert_eq!(api.requests(), vec!["big cats".to_string()]);
    }

    #[test]
    fn slow_earlier_search_never_shows_up() {
        let (mut controller, api) = controller("http://localhost:4321/swap/");
        controller.mount();

        controller.submit("slow");
        controller.submit("dogs");
        assert!(controller.wait_until_settled(SETTLE));
        let view = controller.view();
        assert_eq!(view.results[0].title, "dogs 1");

        // Give the superseded request every chance to report.
        controller.pump(Duration::from_millis(700));
        assert_eq!(controller.view().results[0].title, "dogs 1");
        assert_eq!(
            controller.location().query_param(QUERY_PARAM).as_deref(),
            Some("dogs")
        );
        assert!(api.requests().contains(&"dogs".to_string()));
    }

    #[test]
    fn transport_error_is_shown_and_resubmit_recovers() {
        let (mut controller, _api) = controller("http://localhost:4321/swap/");
        controller.mount();

        controller.submit("down");
        assert!(controller.wait_until_settled(SETTLE));
        assert_eq!(
            controller.view().error_message.as_deref(),
            Some("network error: connection refused")
        );

        controller.submit("cats");
        assert!(controller.wait_until_settled(SETTLE));
        assert_eq!(controller.view().mode, RenderMode::Results);
    }
}
