use std::fmt;

use crate::response::SearchResponse;
use crate::view_model::SearchViewModel;

/// Tag attached to every issued request; only the newest one may settle.
pub type RequestId = u64;

/// The trimmed, non-empty search text currently being searched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Trim `raw`; blank input yields no query.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of the search for the current query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(SearchResponse),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    input: String,
    query: Option<Query>,
    fetch: FetchState,
    in_flight: Option<RequestId>,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SearchViewModel {
        SearchViewModel::from_parts(&self.input, self.query.as_ref(), &self.fetch, self.dirty)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    /// Request whose settlement would currently be observed, if any.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn is_current_request(&self, request_id: RequestId) -> bool {
        self.in_flight == Some(request_id)
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_input(&mut self, raw: String) {
        if self.input != raw {
            self.input = raw;
            self.mark_dirty();
        }
    }

    /// Same query already loading or loaded: a resubmit must not refetch.
    pub(crate) fn is_memoized(&self, query: &Query) -> bool {
        self.query.as_ref() == Some(query)
            && matches!(self.fetch, FetchState::Loading | FetchState::Success(_))
    }

    /// Supersede whatever is in flight and start loading `query`.
    pub(crate) fn begin_search(&mut self, query: Query) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.query = Some(query);
        self.fetch = FetchState::Loading;
        self.in_flight = Some(request_id);
        self.mark_dirty();
        request_id
    }

    /// Blank query: back to idle, dropping any in-flight request.
    pub(crate) fn clear_query(&mut self) {
        let changed = self.query.is_some() || self.fetch != FetchState::Idle;
        self.query = None;
        self.fetch = FetchState::Idle;
        self.in_flight = None;
        if changed {
            self.mark_dirty();
        }
    }

    /// Apply a terminal state for `request_id`. Returns false (and changes
    /// nothing) when the request has been superseded.
    pub(crate) fn settle(&mut self, request_id: RequestId, outcome: FetchState) -> bool {
        if !self.is_current_request(request_id) {
            return false;
        }
        self.in_flight = None;
        self.fetch = outcome;
        self.mark_dirty();
        true
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
