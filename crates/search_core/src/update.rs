use crate::{normalize_response, AppState, Effect, FetchState, Msg, Query};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded { initial_query } => {
            // The input mirrors the location verbatim; only the fetch sees the trimmed form.
            let raw = initial_query.unwrap_or_default();
            let query = Query::parse(&raw);
            state.set_input(raw);
            match query {
                Some(query) => start_search(&mut state, query),
                None => {
                    state.clear_query();
                    Vec::new()
                }
            }
        }
        Msg::InputChanged(raw) => {
            state.set_input(raw);
            Vec::new()
        }
        Msg::QuerySubmitted => {
            let Some(query) = Query::parse(state.input()) else {
                return (state, Vec::new());
            };
            let mut effects = vec![Effect::ReplaceLocationQuery {
                query: query.to_string(),
            }];
            if !state.is_memoized(&query) {
                effects.extend(start_search(&mut state, query));
            }
            effects
        }
        Msg::SearchSettled { request_id, result } => {
            let outcome = match result {
                Ok(payload) => FetchState::Success(normalize_response(&payload)),
                Err(message) => FetchState::Error(message),
            };
            state.settle(request_id, outcome);
            Vec::new()
        }
    };

    (state, effects)
}

fn start_search(state: &mut AppState, query: Query) -> Vec<Effect> {
    let text = query.to_string();
    let request_id = state.begin_search(query);
    vec![Effect::IssueSearch {
        request_id,
        query: text,
    }]
}
