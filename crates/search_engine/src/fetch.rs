use std::time::Duration;

use futures_util::StreamExt;
use search_logging::search_debug;
use url::Url;

use crate::{FailureKind, FetchError};

/// Path appended to the configured base URL.
pub const SEARCH_PATH: &str = "search";
/// Query parameter carrying the search text on outbound requests.
pub const SEARCH_QUERY_PARAM: &str = "q";

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl SearchSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }

    /// `{base_url}/search?q={query}`; any query already on the base URL is dropped.
    pub fn search_url(&self, query: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                FetchError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot be a base url", self.base_url),
                )
            })?;
            segments.pop_if_empty().push(SEARCH_PATH);
        }
        url.set_fragment(None);
        url.query_pairs_mut().clear().append_pair(SEARCH_QUERY_PARAM, query);
        Ok(url)
    }
}

/// Remote search endpoint. Returns the decoded JSON body, unvalidated.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<serde_json::Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    settings: SearchSettings,
    client: reqwest::Client,
}

impl ReqwestSearchClient {
    pub fn new(settings: SearchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl SearchBackend for ReqwestSearchClient {
    async fn search(&self, query: &str) -> Result<serde_json::Value, FetchError> {
        let url = self.settings.search_url(query)?;
        search_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        let bytes = self.read_body(response).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::InvalidBody, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
