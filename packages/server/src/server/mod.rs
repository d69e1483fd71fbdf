// HTTP server setup (Axum + Slack webhooks)
pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;
