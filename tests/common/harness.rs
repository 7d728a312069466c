//! Test server harness.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use quizdoc::completion::MockCompletionService;
use quizdoc::constants::shard_object_name;
use quizdoc::corpus::{CorpusConfig, CorpusStore, HttpObjectSource};
use quizdoc::gateway::{HandlerState, create_router_with_state};
use quizdoc::pipeline::QuizAnalyzer;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// A running axum server that stops when dropped.
pub struct SpawnedServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl SpawnedServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for SpawnedServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

async fn serve(app: Router) -> Result<SpawnedServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(SpawnedServer {
        addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// In-memory corpus objects served over HTTP, with a request log.
#[derive(Debug, Clone, Default)]
pub struct CorpusFixture {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CorpusFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(self, metadata: Value) -> Self {
        self.insert("metadata.json", &metadata);
        self
    }

    pub fn with_shard(self, index: usize, chunks: Value) -> Self {
        self.insert(&shard_object_name(index), &chunks);
        self
    }

    pub fn insert(&self, object: &str, value: &Value) {
        self.objects
            .lock()
            .insert(object.to_string(), value.to_string().into_bytes());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, object: &str) -> usize {
        self.requests.lock().iter().filter(|o| *o == object).count()
    }

    pub fn shard_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|o| o.starts_with("chunks_"))
            .collect()
    }
}

async fn object_handler(
    State(fixture): State<CorpusFixture>,
    Path(object): Path<String>,
) -> Response {
    fixture.requests.lock().push(object.clone());

    let body = fixture.objects.lock().get(&object).cloned();
    match body {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serves `fixture` as a static object store rooted at `/data/`.
pub async fn spawn_corpus_server(fixture: CorpusFixture) -> Result<SpawnedServer, ServerStartupError> {
    let app = Router::new()
        .route("/data/{object}", get(object_handler))
        .with_state(fixture);
    serve(app).await
}

/// Gateway wired to a real HTTP corpus and a scripted completion service.
pub struct TestGateway {
    pub server: SpawnedServer,
    pub corpus_server: SpawnedServer,
    pub corpus: CorpusFixture,
    pub service: MockCompletionService,
}

impl TestGateway {
    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn corpus_url(&self) -> String {
        format!("{}/data/", self.corpus_server.url())
    }
}

pub async fn spawn_test_gateway(
    corpus: CorpusFixture,
    service: MockCompletionService,
) -> Result<TestGateway, ServerStartupError> {
    let corpus_server = spawn_corpus_server(corpus.clone()).await?;

    let source = HttpObjectSource::new(
        &format!("{}/data", corpus_server.url()),
        Duration::from_secs(5),
    )
    .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let store = CorpusStore::new(Arc::new(source), CorpusConfig::default())
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let analyzer = QuizAnalyzer::new(Arc::new(service.clone()), Arc::new(store));
    let state = HandlerState::new(analyzer, Duration::from_secs(10));

    let server = serve(create_router_with_state(state)).await?;

    Ok(TestGateway {
        server,
        corpus_server,
        corpus,
        service,
    })
}
