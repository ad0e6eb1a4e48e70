//! Search engine: HTTP transport and background execution of search effects.
mod engine;
mod fetch;
mod types;

pub use engine::EngineHandle;
pub use fetch::{
    ReqwestSearchClient, SearchBackend, SearchSettings, SEARCH_PATH, SEARCH_QUERY_PARAM,
};
pub use types::{EngineError, EngineEvent, FailureKind, FetchError, RequestId};
