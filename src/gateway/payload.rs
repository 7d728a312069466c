use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::completion::ImageSource;
use crate::gateway::error::GatewayError;
use crate::pipeline::AnalysisMetadata;

/// POST body. Content parts stay raw; only the image part is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub messages: Vec<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub content: Vec<Value>,
}

impl AnalyzeRequest {
    /// Source of the first `image` part of the first message.
    pub fn image(&self) -> Result<ImageSource, GatewayError> {
        let message = self.messages.first().ok_or_else(|| {
            GatewayError::InvalidRequest("`messages` must contain at least one message".to_string())
        })?;

        let part = message
            .content
            .iter()
            .find(|part| part.get("type").and_then(Value::as_str) == Some("image"))
            .ok_or(GatewayError::ImageMissing)?;

        let source = part.get("source").cloned().ok_or_else(|| {
            GatewayError::InvalidRequest("image content part has no `source`".to_string())
        })?;

        serde_json::from_value(source)
            .map_err(|e| GatewayError::InvalidRequest(format!("invalid image source: {e}")))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub content: Vec<Value>,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentsInfo {
    pub chunks: usize,
    pub pages: usize,
}

/// GET diagnostic body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub api_key_configured: bool,
    pub documents_loaded: bool,
    pub documents_info: Option<DocumentsInfo>,
    pub github_url: String,
    pub instructions: &'static str,
}
