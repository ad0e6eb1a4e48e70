#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the trimmed query into the page location, replacing the current
    /// history entry.
    ReplaceLocationQuery { query: String },
    /// Send one search request tagged with `request_id`.
    IssueSearch {
        request_id: crate::RequestId,
        query: String,
    },
}
