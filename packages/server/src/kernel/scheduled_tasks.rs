//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Two independent jobs drive the weekly lunch:
//! - Reminder on the lunch day at the reminder hour
//! - Group publication on the lunch day at the cutoff hour
//!
//! # Architecture
//!
//! The scheduler owns the timers; the orchestrator only exposes idempotent
//! operations. Jobs may fire more than once or concurrently, and a failing
//! run is logged without affecting the other job or the process.
//!
//! ```text
//! Scheduler (lunch day, cutoff hour)
//!     │
//!     └─► orchestrator.publish_due()
//!             └─► already published? → no-op
//!                 otherwise → partition roster → store → announce
//! ```

use std::sync::Arc;

use anyhow::Result;
use chrono::Weekday;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::lunch::{LunchOrchestrator, PublishOutcome};

/// Start all scheduled tasks
pub async fn start_scheduler(orchestrator: Arc<LunchOrchestrator>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let settings = orchestrator.settings().clone();
    let window = settings.window;
    let publish_schedule = weekly_schedule(window.weekday(), window.cutoff_hour());
    let reminder_schedule = weekly_schedule(window.weekday(), settings.reminder_hour);

    // Group publication - lunch day at the cutoff hour
    let publish_orchestrator = orchestrator.clone();
    let publish_job =
        Job::new_async_tz(publish_schedule.as_str(), window.offset(), move |_uuid, _lock| {
            let orchestrator = publish_orchestrator.clone();
            Box::pin(async move {
                run_publish(&orchestrator).await;
            })
        })?;

    scheduler.add(publish_job).await?;

    // Reminder - lunch day at the reminder hour
    let reminder_orchestrator = orchestrator.clone();
    let reminder_job =
        Job::new_async_tz(reminder_schedule.as_str(), window.offset(), move |_uuid, _lock| {
            let orchestrator = reminder_orchestrator.clone();
            Box::pin(async move {
                run_reminder(&orchestrator).await;
            })
        })?;

    scheduler.add(reminder_job).await?;
    scheduler.start().await?;

    tracing::info!(
        publish = %publish_schedule,
        reminder = %reminder_schedule,
        offset = %window.offset(),
        "Scheduled tasks started"
    );
    Ok(scheduler)
}

/// Six-field cron expression firing weekly at `hour`:00:00 on `weekday`.
pub fn weekly_schedule(weekday: Weekday, hour: u32) -> String {
    format!("0 0 {} * * {}", hour, weekday.to_string().to_uppercase())
}

/// Run the publish task, logging instead of propagating failures
pub async fn run_publish(orchestrator: &LunchOrchestrator) {
    tracing::info!("Running lunch publish task");

    match orchestrator.publish_due().await {
        Ok(PublishOutcome::Published { event, assignment }) => {
            tracing::info!(
                event = %event,
                groups = assignment.len(),
                "Publish task complete"
            );
        }
        Ok(PublishOutcome::AlreadyPublished { event }) => {
            tracing::info!(event = %event, "Publish task found groups already published");
        }
        Err(e) => {
            tracing::error!(operation = e.operation(), error = %e, "Lunch publish task failed");
        }
    }
}

/// Run the reminder task, logging instead of propagating failures
pub async fn run_reminder(orchestrator: &LunchOrchestrator) {
    tracing::info!("Running lunch reminder task");

    if let Err(e) = orchestrator.send_reminder().await {
        tracing::error!(operation = e.operation(), error = %e, "Lunch reminder task failed");
    }
}
