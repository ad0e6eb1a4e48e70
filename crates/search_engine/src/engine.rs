use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use search_logging::{search_debug, search_info, search_warn};
use tokio_util::sync::CancellationToken;

use crate::fetch::{ReqwestSearchClient, SearchBackend, SearchSettings};
use crate::{EngineError, EngineEvent, RequestId};

enum EngineCommand {
    Search { request_id: RequestId, query: String },
}

/// Runs searches on a background tokio runtime.
///
/// Issuing a search cancels the one still in flight, so at most one request
/// is outstanding and only its settlement is reported.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SearchSettings) -> Result<Self, EngineError> {
        let backend = ReqwestSearchClient::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn SearchBackend>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("search-worker")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("search-engine".to_string())
            .spawn(move || {
                let mut in_flight: Option<CancellationToken> = None;
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Search { request_id, query } => {
                            if let Some(previous) = in_flight.take() {
                                previous.cancel();
                            }
                            let token = CancellationToken::new();
                            in_flight = Some(token.clone());
                            runtime.spawn(run_search(
                                backend.clone(),
                                request_id,
                                query,
                                token,
                                event_tx.clone(),
                            ));
                        }
                    }
                }
                search_debug!("search engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn search(&self, request_id: RequestId, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Search {
            request_id,
            query: query.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_search(
    backend: Arc<dyn SearchBackend>,
    request_id: RequestId,
    query: String,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    search_info!("search #{} issued query_len={}", request_id, query.len());
    let result = tokio::select! {
        _ = token.cancelled() => {
            search_debug!("search #{} superseded before settling", request_id);
            return;
        }
        result = backend.search(&query) => result,
    };
    match &result {
        Ok(_) => search_info!("search #{} settled", request_id),
        Err(err) => search_warn!("search #{} failed: {}", request_id, err),
    }
    let _ = event_tx.send(EngineEvent::SearchCompleted {
        request_id,
        query,
        result,
    });
}
