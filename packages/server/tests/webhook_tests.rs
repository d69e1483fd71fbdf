//! Slack webhook tests: signed slash commands and button presses through the
//! full router, with the orchestrator on in-memory collaborators.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use lunch_core::common::ParticipantId;
use lunch_core::kernel::BaseClock;
use lunch_core::server::{build_app, AppState};
use serde_json::{json, Value};
use slack::{SlackMessage, SlackOptions, SlackService, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use tower::ServiceExt;

use crate::common::*;

const SIGNING_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

struct TestApp {
    lunch: TestLunch,
    slack: Arc<SlackService>,
    router: Router,
}

impl TestApp {
    fn at(now: DateTime<Utc>) -> Self {
        let lunch = TestLunch::at(now);
        let slack = Arc::new(SlackService::new(SlackOptions {
            signing_secret: SIGNING_SECRET.to_string(),
        }));
        let router = build_app(AppState::new(
            lunch.orchestrator.clone(),
            slack.clone(),
            SLASH_COMMAND,
        ));
        Self {
            lunch,
            slack,
            router,
        }
    }

    fn signed(&self, uri: &str, body: String, timestamp: i64) -> Request<Body> {
        let timestamp = timestamp.to_string();
        let signature = self.slack.sign(&timestamp, body.as_bytes()).unwrap();
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .header(TIMESTAMP_HEADER, timestamp)
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body))
            .unwrap()
    }

    fn now(&self) -> i64 {
        self.lunch.deps.clock.now().timestamp()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn command(&self, user: &str, text: &str) -> (StatusCode, Value) {
        let body = command_body(SLASH_COMMAND, user, text);
        self.send(self.signed("/", body, self.now())).await
    }

    async fn press(&self, user: &str, value: &str) -> (StatusCode, Value) {
        let payload = json!({
            "type": "interactive_message",
            "user": { "id": user },
            "actions": [{ "name": "lunch", "value": value }],
            "response_url": "https://hooks.slack.com/actions/T000/1/xyz",
        });
        self.send(self.signed("/action", action_body(&payload), self.now()))
            .await
    }
}

fn command_body(command: &str, user: &str, text: &str) -> String {
    format!(
        "command={}&user_id={}&text={}&response_url={}",
        urlencoding::encode(command),
        urlencoding::encode(user),
        urlencoding::encode(text),
        urlencoding::encode("https://hooks.slack.com/commands/T000/1/abc"),
    )
}

fn action_body(payload: &Value) -> String {
    format!("payload={}", urlencoding::encode(&payload.to_string()))
}

fn message(body: Value) -> SlackMessage {
    serde_json::from_value(body).unwrap()
}

fn button_values(message: &SlackMessage) -> Vec<String> {
    message.actions().map(|a| a.value.clone()).collect()
}

// =============================================================================
// Slash command
// =============================================================================

#[tokio::test]
async fn status_command_offers_join_button() {
    let app = TestApp::at(thursday_morning());

    let (status, body) = app.command("U1", "").await;

    assert_eq!(status, StatusCode::OK);
    let message = message(body);
    assert!(message.text.contains("Next lunch date is *Friday 5.1*"));
    assert_eq!(message.replace_original, Some(true));
    assert_eq!(button_values(&message), vec!["join"]);
}

#[tokio::test]
async fn status_command_after_cutoff_says_too_late() {
    let app = TestApp::at(thursday_morning());
    app.lunch.set_time(friday_cutoff());

    let (status, body) = app.command("U1", "").await;

    assert_eq!(status, StatusCode::OK);
    let message = message(body);
    assert!(message.text.contains("too late to join"));
    assert!(message.attachments.is_empty());
}

#[tokio::test]
async fn groups_command_before_cutoff_reports_not_published() {
    let app = TestApp::at(thursday_morning());

    let (status, body) = app.command("U1", "groups").await;

    assert_eq!(status, StatusCode::OK);
    assert!(message(body).text.contains("haven't been published yet"));
    assert_eq!(app.lunch.deps.notifier.sent_count(), 0);
}

#[tokio::test]
async fn groups_command_after_publish_reposts_groups() {
    let app = TestApp::at(thursday_morning());
    for user in ["U1", "U2", "U3"] {
        app.press(user, "join").await;
    }
    app.lunch.set_time(friday_cutoff());
    app.lunch.orchestrator.publish_due().await.unwrap();

    let (status, body) = app.command("U1", "groups").await;

    assert_eq!(status, StatusCode::OK);
    assert!(message(body).text.contains(PUBLISH_CHANNEL_ID));
    let sent = app.lunch.deps.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].destination, PUBLISH_CHANNEL_URL);
    assert!(sent[1].message.text.contains("*Group 1:*"));
}

#[tokio::test]
async fn unknown_command_is_rejected() {
    let app = TestApp::at(thursday_morning());
    let body = command_body("/other-command", "U1", "");

    let (status, body) = app.send(app.signed("/", body, app.now())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Command failed" }));
}

#[tokio::test]
async fn store_failure_returns_generic_error() {
    let app = TestApp::at(thursday_morning());
    app.lunch.deps.roster_store.set_unavailable(true);

    let (status, body) = app.command("U1", "").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Command failed" }));
}

// =============================================================================
// Buttons
// =============================================================================

#[tokio::test]
async fn join_button_adds_member_and_offers_cancel() {
    let app = TestApp::at(thursday_morning());

    let (status, body) = app.press("U1", "join").await;

    assert_eq!(status, StatusCode::OK);
    let message = message(body);
    assert!(message.text.contains("You have joined the next lunch on *Friday 5.1*"));
    assert_eq!(button_values(&message), vec!["leave"]);
    assert!(app
        .lunch
        .deps
        .roster_store
        .members(this_friday())
        .contains(&ParticipantId::from("U1")));
}

#[tokio::test]
async fn cancel_button_removes_member() {
    let app = TestApp::at(thursday_morning());
    app.press("U1", "join").await;

    let (status, body) = app.press("U1", "leave").await;

    assert_eq!(status, StatusCode::OK);
    let message = message(body);
    assert!(message.text.contains("You have left"));
    assert_eq!(button_values(&message), vec!["join"]);
    assert!(app.lunch.deps.roster_store.members(this_friday()).is_empty());
}

#[tokio::test]
async fn join_button_after_cutoff_changes_nothing() {
    let app = TestApp::at(friday_cutoff());

    let (status, body) = app.press("U1", "join").await;

    assert_eq!(status, StatusCode::OK);
    assert!(message(body).text.contains("too late to join"));
    assert_eq!(app.lunch.deps.roster_store.call_counts().add_member, 0);
}

#[tokio::test]
async fn unknown_action_is_ignored() {
    let app = TestApp::at(thursday_morning());
    let payload = json!({
        "type": "interactive_message",
        "user": { "id": "U1" },
        "actions": [{ "name": "something_else", "value": "join" }],
    });

    let (status, body) = app
        .send(app.signed("/action", action_body(&payload), app.now()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    assert!(app.lunch.deps.roster_store.members(this_friday()).is_empty());
}

#[tokio::test]
async fn malformed_payload_is_rejected() {
    let app = TestApp::at(thursday_morning());
    let body = format!("payload={}", urlencoding::encode("{not json"));

    let (status, body) = app.send(app.signed("/action", body, app.now())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Action failed" }));
}

// =============================================================================
// Request signing
// =============================================================================

#[tokio::test]
async fn unsigned_request_is_rejected() {
    let app = TestApp::at(thursday_morning());
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(command_body(SLASH_COMMAND, "U1", "")))
        .unwrap();

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_body_is_rejected() {
    let app = TestApp::at(thursday_morning());
    let mut request = app.signed("/", command_body(SLASH_COMMAND, "U1", ""), app.now());
    *request.body_mut() = Body::from(command_body(SLASH_COMMAND, "U2", ""));

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stale_request_is_rejected() {
    let app = TestApp::at(thursday_morning());
    let ten_minutes_ago = app.now() - 600;

    let (status, body) = app
        .send(app.signed(
            "/",
            command_body(SLASH_COMMAND, "U1", ""),
            ten_minutes_ago,
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid request signature" }));
    assert_eq!(app.lunch.deps.roster_store.call_counts().get_members, 0);
}

#[tokio::test]
async fn health_check_needs_no_signature() {
    let app = TestApp::at(thursday_morning());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["next_event"], "20180105");
    assert_eq!(body["phase"], "Open");
}
