#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Page mounted; carries the raw `q` parameter read from the location.
    PageLoaded { initial_query: Option<String> },
    /// User edited the search input box.
    InputChanged(String),
    /// User submitted the current search input.
    QuerySubmitted,
    /// Transport settled for a previously issued request.
    SearchSettled {
        request_id: crate::RequestId,
        result: Result<serde_json::Value, String>,
    },
}
