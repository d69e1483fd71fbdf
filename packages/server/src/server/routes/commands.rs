use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Form, Json};
use slack::SlashCommand;
use tracing::{error, warn};

use super::failure;
use crate::common::ParticipantId;
use crate::server::app::AppState;

/// Slash command text that re-posts this week's groups.
const GROUPS_ARGUMENT: &str = "groups";

/// Slash command endpoint (`/social-lunch`, `/social-lunch groups`)
pub async fn command_handler(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> Response {
    if command.command != state.slash_command {
        warn!(command = %command.command, "Invalid command");
        return (StatusCode::BAD_REQUEST, failure("Command failed")).into_response();
    }

    let orchestrator = &state.orchestrator;
    let messages = orchestrator.messages();

    let result = if command.text.trim() == GROUPS_ARGUMENT {
        orchestrator
            .show_groups()
            .await
            .map(|outcome| messages.show_groups(&outcome))
    } else {
        let user = ParticipantId::from(command.user_id);
        orchestrator
            .status(&user)
            .await
            .map(|report| messages.status(&report).replacing_original())
    };

    match result {
        Ok(message) => Json(message).into_response(),
        Err(e) => {
            error!(operation = e.operation(), error = %e, "Command failed");
            (StatusCode::INTERNAL_SERVER_ERROR, failure("Command failed")).into_response()
        }
    }
}
