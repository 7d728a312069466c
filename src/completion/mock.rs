//! Scripted completion service for tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CompletionService;
use super::error::{CompletionError, CompletionResult};
use super::types::{CompletionRequest, CompletionResponse};
use crate::constants::DEFAULT_MODEL;

/// Returns queued responses in order and records every request.
///
/// An exhausted queue answers with HTTP 503.
#[derive(Debug, Clone)]
pub struct MockCompletionService {
    responses: Arc<Mutex<VecDeque<CompletionResult<CompletionResponse>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    configured: bool,
    model: String,
    delay: Option<Duration>,
}

impl Default for MockCompletionService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            configured: true,
            model: DEFAULT_MODEL.to_string(),
            delay: None,
        }
    }

    /// A service without a credential.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Sleeps for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.push_response(CompletionResponse::text(text))
    }

    pub fn push_response(&self, response: CompletionResponse) -> &Self {
        self.responses.lock().push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: CompletionError) -> &Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<CompletionResponse> {
        if !self.configured {
            return Err(CompletionError::MissingCredential);
        }

        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(CompletionError::Status {
                    status: 503,
                    body: "no scripted response".to_string(),
                })
            })
    }
}
