use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::gateway::error::{GatewayError, timestamp_now};
use crate::gateway::payload::{AnalyzeRequest, AnalyzeResponse, DocumentsInfo, ProbeResponse};
use crate::gateway::state::HandlerState;

const PROBE_MESSAGE: &str = "Quiz Assistant API - Con Documenti";
const READY_INSTRUCTIONS: &str = "API pronta con documenti. Accuratezza migliorata!";
const SETUP_INSTRUCTIONS: &str = "Configura ANTHROPIC_API_KEY e carica i documenti su GitHub";

/// Diagnostic probe. Loads the corpus as a side effect.
#[instrument(skip(state))]
pub async fn probe_handler(State(state): State<HandlerState>) -> Json<ProbeResponse> {
    let api_key_configured = state.service().is_configured();

    let documents_info = match state.corpus().load().await {
        Ok(corpus) if !corpus.is_empty() => Some(DocumentsInfo {
            chunks: corpus.len(),
            pages: corpus.distinct_pages(),
        }),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "Corpus probe failed");
            None
        }
    };
    let documents_loaded = documents_info.is_some();

    Json(ProbeResponse {
        status: "ok",
        message: PROBE_MESSAGE,
        timestamp: timestamp_now(),
        api_key_configured,
        documents_loaded,
        documents_info,
        github_url: state.corpus().location().to_string(),
        instructions: if api_key_configured && documents_loaded {
            READY_INSTRUCTIONS
        } else {
            SETUP_INSTRUCTIONS
        },
    })
}

#[instrument(skip(state, body), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn analyze_handler(
    State(state): State<HandlerState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, GatewayError> {
    if !state.service().is_configured() {
        return Err(GatewayError::CredentialMissing);
    }

    let Json(body) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let request: AnalyzeRequest = serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {e}")))?;
    let image = request.image()?;

    info!("Starting quiz analysis");

    let outcome = tokio::time::timeout(state.request_timeout, state.analyzer.analyze(&image))
        .await
        .map_err(|_| {
            warn!(timeout = ?state.request_timeout, "Analysis timed out");
            GatewayError::Timeout {
                secs: state.request_timeout.as_secs(),
            }
        })?
        .map_err(|e| {
            error!(error = %e, "Analysis failed");
            GatewayError::from(e)
        })?;

    Ok(Json(AnalyzeResponse {
        content: outcome.content,
        metadata: outcome.metadata,
    }))
}

/// CORS preflight for clients that reach the handler directly.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    GatewayError::MethodNotAllowed.into_response()
}
