//! HTTP client helpers for tests.

use std::time::Duration;

use serde_json::{Value, json};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ANALYZE_PATH: &str = "/api/analyze-with-docs";

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn into_parts(resp: reqwest::Response) -> (u16, Value) {
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.expect("response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }

    pub async fn health(&self) -> (u16, Value) {
        let resp = self
            .client
            .get(self.url("/healthz"))
            .send()
            .await
            .expect("health request");
        Self::into_parts(resp).await
    }

    pub async fn probe(&self) -> (u16, Value) {
        let resp = self
            .client
            .get(self.url(ANALYZE_PATH))
            .send()
            .await
            .expect("probe request");
        Self::into_parts(resp).await
    }

    pub async fn analyze(&self, body: &Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(ANALYZE_PATH))
            .json(body)
            .send()
            .await
            .expect("analyze request");
        Self::into_parts(resp).await
    }

    pub async fn send(&self, method: reqwest::Method, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .request(method, self.url(path))
            .send()
            .await
            .expect("request");
        Self::into_parts(resp).await
    }
}

pub fn image_request() -> Value {
    json!({
        "messages": [{
            "role": "user",
            "content": [
                { "type": "image", "source": { "type": "base64", "media_type": "image/jpeg", "data": "/9j/4AAQSkZJRg==" } },
                { "type": "text", "text": "Analizza il quiz" }
            ]
        }]
    })
}
