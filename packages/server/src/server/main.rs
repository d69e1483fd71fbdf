// Main entry point for the social lunch bot

use std::sync::Arc;

use anyhow::{Context, Result};
use lunch_core::{
    domains::lunch::LunchOrchestrator,
    kernel::{start_scheduler, ServerDeps},
    server::{build_app, AppState},
    Config,
};
use slack::{SlackOptions, SlackService};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lunch_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    tracing::info!("Starting Social Lunch bot");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let settings = config.lunch_settings()?;
    tracing::info!(
        weekday = %config.lunch_weekday,
        publish_hour = config.publish_hour,
        reminder_hour = config.reminder_hour,
        utc_offset_hours = config.utc_offset_hours,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let slack = Arc::new(SlackService::new(SlackOptions {
        signing_secret: config.slack_signing_secret.clone(),
    }));
    let orchestrator = Arc::new(LunchOrchestrator::new(
        ServerDeps::production(pool, slack.clone()),
        settings,
    ));

    // Start cron jobs (publish + reminder)
    let mut scheduler = start_scheduler(orchestrator.clone())
        .await
        .context("Failed to start scheduler")?;

    let app = build_app(AppState::new(orchestrator, slack, config.slash_command.clone()));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down scheduler");
    scheduler
        .shutdown()
        .await
        .context("Failed to stop scheduler")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
