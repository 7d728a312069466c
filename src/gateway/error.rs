use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use crate::constants::API_KEY_ENV;
use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("image not found in request")]
    ImageMissing,

    #[error("{} not configured", API_KEY_ENV)]
    CredentialMissing,

    #[error("{0}")]
    Upstream(String),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl From<PipelineError> for GatewayError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::CredentialMissing => Self::CredentialMissing,
            upstream @ PipelineError::Upstream { .. } => Self::Upstream(upstream.to_string()),
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::ImageMissing => StatusCode::BAD_REQUEST,
            GatewayError::CredentialMissing | GatewayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// RFC 3339 UTC timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let timestamp = match &self {
            GatewayError::MethodNotAllowed => None,
            _ => Some(timestamp_now()),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            timestamp,
        });

        (status, body).into_response()
    }
}
