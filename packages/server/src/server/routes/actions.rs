use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Form, Json};
use serde::Deserialize;
use slack::InteractivePayload;
use tracing::{error, info, warn};

use super::failure;
use crate::common::ParticipantId;
use crate::domains::lunch::messages::{ACTION_NAME, JOIN_VALUE, LEAVE_VALUE};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    pub payload: String,
}

/// Interactive message endpoint (Join / Cancel buttons)
pub async fn action_handler(
    State(state): State<AppState>,
    Form(form): Form<ActionForm>,
) -> Response {
    let payload: InteractivePayload = match serde_json::from_str(&form.payload) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Unparseable action payload");
            return (StatusCode::BAD_REQUEST, failure("Action failed")).into_response();
        }
    };

    let Some(action) = payload.actions.first() else {
        return StatusCode::OK.into_response();
    };
    if !payload.is_interactive_message() || action.name != ACTION_NAME {
        return StatusCode::OK.into_response();
    }

    let user = ParticipantId::from(payload.user.id.as_str());
    let orchestrator = &state.orchestrator;
    let result = match action.value.as_str() {
        JOIN_VALUE => {
            info!(user = %user, "Join pressed");
            orchestrator.join(&user).await
        }
        LEAVE_VALUE => {
            info!(user = %user, "Cancel pressed");
            orchestrator.leave(&user).await
        }
        other => {
            warn!(value = other, "Unknown lunch action");
            return StatusCode::OK.into_response();
        }
    };

    match result {
        Ok(outcome) => Json(orchestrator.messages().membership(&outcome).replacing_original())
            .into_response(),
        Err(e) => {
            error!(operation = e.operation(), error = %e, "Action failed");
            (StatusCode::INTERNAL_SERVER_ERROR, failure("Action failed")).into_response()
        }
    }
}
