use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, instrument};

use super::CompletionService;
use super::error::{CompletionError, CompletionResult};
use super::types::{CompletionRequest, CompletionResponse};
use crate::config::Config;
use crate::constants::ANTHROPIC_VERSION;

/// Upstream error bodies are cut to this many characters in error messages.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Messages-API client.
#[derive(Clone)]
pub struct AnthropicClient {
    http: HttpClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicClient {
    pub fn new(config: &Config) -> CompletionResult<Self> {
        let http = HttpClient::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| CompletionError::Config(e.to_string()))?;

        Ok(Self::with_client(
            http,
            &config.api_url,
            config.api_key.clone(),
            &config.model,
        ))
    }

    pub fn with_client(
        http: HttpClient,
        api_url: &str,
        api_key: Option<String>,
        model: &str,
    ) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.api_url)
    }
}

#[async_trait]
impl CompletionService for AnthropicClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %request.model, max_tokens = request.max_tokens))]
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<CompletionResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let resp = self
            .http
            .post(self.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let response = resp
            .json::<CompletionResponse>()
            .await
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        debug!(blocks = response.content.len(), "Completion received");
        Ok(response)
    }
}
