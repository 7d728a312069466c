//! Object-store access for corpus files.
//!
//! `HttpObjectSource` reads `{base_url}{object}` over HTTP. `MockObjectSource` is an
//! in-memory store that also records every requested object name.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use super::error::{CorpusError, CorpusResult};
use crate::config::normalize_base_url;

#[async_trait]
/// Read access to named objects under a fixed base location.
pub trait ObjectSource: Send + Sync {
    /// Fetches the raw body of `object`. Any non-success response is an error.
    async fn fetch(&self, object: &str) -> CorpusResult<Vec<u8>>;

    /// Human-readable base location (for logs and the diagnostic probe).
    fn location(&self) -> &str;
}

/// HTTP implementation (e.g. a raw-file host or a static bucket).
#[derive(Debug, Clone)]
pub struct HttpObjectSource {
    http: HttpClient,
    base_url: String,
}

impl HttpObjectSource {
    /// Creates a source rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> CorpusResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CorpusError::Config {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self::with_client(http, base_url))
    }

    /// Creates a source that reuses an existing client.
    pub fn with_client(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    fn url(&self, object: &str) -> String {
        format!("{}{}", self.base_url, object.trim_start_matches('/'))
    }
}

#[async_trait]
impl ObjectSource for HttpObjectSource {
    async fn fetch(&self, object: &str) -> CorpusResult<Vec<u8>> {
        let resp = self
            .http
            .get(self.url(object))
            .send()
            .await
            .map_err(|e| CorpusError::Transport {
                object: object.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CorpusError::ObjectStatus {
                object: object.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| CorpusError::Transport {
            object: object.to_string(),
            reason: e.to_string(),
        })?;

        Ok(body.to_vec())
    }

    fn location(&self) -> &str {
        &self.base_url
    }
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default, Clone)]
pub struct MockObjectSource {
    objects: std::sync::Arc<parking_lot::RwLock<std::collections::HashMap<String, Vec<u8>>>>,
    broken: std::sync::Arc<parking_lot::RwLock<std::collections::HashSet<String>>>,
    requests: std::sync::Arc<parking_lot::Mutex<Vec<String>>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockObjectSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, object: &str, body: impl Into<Vec<u8>>) {
        self.objects.write().insert(object.to_string(), body.into());
    }

    pub fn insert_json(&self, object: &str, value: &serde_json::Value) {
        self.insert(object, value.to_string());
    }

    /// Makes `object` fail at the transport level instead of returning 404.
    pub fn break_object(&self, object: &str) {
        self.broken.write().insert(object.to_string());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, object: &str) -> usize {
        self.requests.lock().iter().filter(|o| *o == object).count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl ObjectSource for MockObjectSource {
    async fn fetch(&self, object: &str) -> CorpusResult<Vec<u8>> {
        self.requests.lock().push(object.to_string());

        if self.broken.read().contains(object) {
            return Err(CorpusError::Transport {
                object: object.to_string(),
                reason: "connection reset".to_string(),
            });
        }

        self.objects
            .read()
            .get(object)
            .cloned()
            .ok_or_else(|| CorpusError::ObjectStatus {
                object: object.to_string(),
                status: 404,
            })
    }

    fn location(&self) -> &str {
        "mock://corpus/"
    }
}
