use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slack::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use tracing::warn;

use crate::server::app::AppState;

/// Slack payloads are small; anything larger is not from Slack.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Middleware rejecting requests that are not signed with the Slack signing secret
///
/// The signature covers the raw body, so the body is buffered, checked and
/// handed on unchanged to the route's extractors.
pub async fn verify_slack_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    };

    let now = state.orchestrator.clock().now().timestamp();
    if let Err(e) = state.slack.verify_signature(
        header(TIMESTAMP_HEADER),
        header(SIGNATURE_HEADER),
        &bytes,
        now,
    ) {
        warn!(path = %parts.uri.path(), error = %e, "Rejected Slack request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid request signature" })),
        )
            .into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
