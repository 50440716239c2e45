//! HTTP surface: `/generate`, `/refine`, `/humanize`, `/health`.
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::GenerationOrchestrator;

pub use handlers::{ApiError, AppState};

pub fn create_app(orchestrator: Arc<GenerationOrchestrator>) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/refine", post(handlers::refine))
        .route("/humanize", post(handlers::humanize))
        .route("/health", get(handlers::health))
        .with_state(orchestrator)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, orchestrator: Arc<GenerationOrchestrator>) -> anyhow::Result<()> {
    let app = create_app(orchestrator);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log::info!("postcraft listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
