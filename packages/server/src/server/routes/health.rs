use axum::{extract::State, Json};
use serde::Serialize;

use crate::domains::lunch::EventPhase;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    next_event: String,
    phase: EventPhase,
}

/// Health check endpoint
///
/// Reports the lunch the bot currently targets. Does not touch the store.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let resolved = state
        .orchestrator
        .window()
        .resolve(state.orchestrator.clock().now());

    Json(HealthResponse {
        status: "healthy".to_string(),
        next_event: resolved.key.to_string(),
        phase: resolved.phase,
    })
}
