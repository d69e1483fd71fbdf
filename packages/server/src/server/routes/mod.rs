// HTTP routes
pub mod actions;
pub mod commands;
pub mod health;

pub use actions::*;
pub use commands::*;
pub use health::*;

use axum::Json;
use serde_json::{json, Value};

/// Generic failure body; details stay in the logs.
pub(crate) fn failure(message: &str) -> Json<Value> {
    Json(json!({ "error": message }))
}
