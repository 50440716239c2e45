//! Request handlers and the JSON error body.
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::content::{
    GenerationRequest, HumanizeRequest, HumanizeResponse, MultiVersionResponse, RefineRequest,
    Version,
};
use crate::pipeline::GenerationOrchestrator;

pub type AppState = Arc<GenerationOrchestrator>;

/// Failure of a pipeline operation, rendered as `500 {"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    detail: String,
}

impl<E: std::error::Error> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self {
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("request failed: {}", self.detail);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": self.detail })),
        )
            .into_response()
    }
}

pub async fn generate(
    State(orchestrator): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<MultiVersionResponse>, ApiError> {
    let versions = orchestrator.generate(&request).await?;
    log::info!("POST /generate: returning {} versions", versions.len());
    Ok(Json(MultiVersionResponse { versions }))
}

pub async fn refine(
    State(orchestrator): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<Version>, ApiError> {
    Ok(Json(orchestrator.refine(&request).await?))
}

pub async fn humanize(
    State(orchestrator): State<AppState>,
    Json(request): Json<HumanizeRequest>,
) -> Result<Json<HumanizeResponse>, ApiError> {
    let humanized_text = orchestrator.humanize(&request.text).await?;
    Ok(Json(HumanizeResponse { humanized_text }))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
}
