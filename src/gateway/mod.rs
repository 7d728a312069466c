//! HTTP gateway (Axum) for quiz analysis.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::{Method, header},
    routing::{MethodRouter, get},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{analyze_handler, method_not_allowed, preflight_handler, probe_handler};
pub use state::HandlerState;

pub const ANALYZE_PATH: &str = "/api/analyze-with-docs";

fn analyze_endpoint() -> MethodRouter<HandlerState> {
    get(probe_handler)
        .post(analyze_handler)
        .options(preflight_handler)
        .fallback(method_not_allowed)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route(ANALYZE_PATH, analyze_endpoint())
        .route("/", analyze_endpoint())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
