//! Search core: pure query-state machine, response normalizer and view-model helpers.
mod effect;
mod location;
mod msg;
mod response;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use location::{initial_query, LocationError, MemoryLocation, PageLocation, QUERY_PARAM};
pub use msg::Msg;
pub use response::{normalize_response, Hit, SearchResponse};
pub use state::{AppState, FetchState, Query, RequestId};
pub use update::update;
pub use view_model::{HitView, RenderMode, SearchViewModel, KEYWORD_SEPARATOR};
