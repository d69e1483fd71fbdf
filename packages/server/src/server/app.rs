//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use slack::SlackService;
use tower_http::trace::TraceLayer;

use crate::domains::lunch::LunchOrchestrator;
use crate::server::middleware::verify_slack_signature;
use crate::server::routes::{action_handler, command_handler, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<LunchOrchestrator>,
    pub slack: Arc<SlackService>,
    /// The only slash command this bot answers, e.g. `/social-lunch`
    pub slash_command: String,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<LunchOrchestrator>,
        slack: Arc<SlackService>,
        slash_command: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            slack,
            slash_command: slash_command.into(),
        }
    }
}

/// Build the Axum application router
///
/// Slack endpoints sit behind request-signature verification; the health
/// check does not.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", post(command_handler))
        .route("/action", post(action_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            verify_slack_signature,
        ))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
