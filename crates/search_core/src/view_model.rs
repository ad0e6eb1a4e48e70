use crate::{FetchState, Hit, Query};

pub const KEYWORD_SEPARATOR: &str = ", ";

/// Exactly one of these is rendered at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Nothing searched yet.
    #[default]
    Idle,
    Error(String),
    Loading,
    /// "No results found."
    Empty,
    Results,
}

impl RenderMode {
    /// Precedence: Error > Loading > Empty > Results.
    pub fn from_state(fetch: &FetchState) -> Self {
        if let FetchState::Error(message) = fetch {
            return RenderMode::Error(message.clone());
        }
        if matches!(fetch, FetchState::Loading) {
            return RenderMode::Loading;
        }
        match fetch {
            FetchState::Success(response) if response.is_empty() => RenderMode::Empty,
            FetchState::Success(_) => RenderMode::Results,
            _ => RenderMode::Idle,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitView {
    pub title: String,
    pub url: String,
    pub keywords: String,
    pub score: f64,
}

impl From<&Hit> for HitView {
    fn from(hit: &Hit) -> Self {
        Self {
            title: hit.title.clone(),
            url: hit.url.clone(),
            keywords: hit.keywords.join(KEYWORD_SEPARATOR),
            score: hit.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchViewModel {
    /// Text mirrored into the search input box.
    pub input_text: String,
    pub query: Option<String>,
    pub mode: RenderMode,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_empty: bool,
    pub results: Vec<HitView>,
    pub query_time: f64,
    pub total_hits: u64,
    pub dirty: bool,
}

impl SearchViewModel {
    pub(crate) fn from_parts(
        input: &str,
        query: Option<&Query>,
        fetch: &FetchState,
        dirty: bool,
    ) -> Self {
        let mode = RenderMode::from_state(fetch);
        let mut view = Self {
            input_text: input.to_owned(),
            query: query.map(ToString::to_string),
            is_loading: mode == RenderMode::Loading,
            error_message: match &mode {
                RenderMode::Error(message) => Some(message.clone()),
                _ => None,
            },
            is_empty: mode == RenderMode::Empty,
            mode,
            dirty,
            ..Self::default()
        };
        if let FetchState::Success(response) = fetch {
            view.results = response.results.iter().map(HitView::from).collect();
            view.query_time = response.query_time;
            view.total_hits = response.total_hits;
        }
        view
    }
}
