//! Lunch domain - weekly sign-up, group shuffling and publication
//!
//! Architecture:
//!   Slack webhook / cron job → LunchOrchestrator → roster store + partitioner → notifier

pub mod actions;
pub mod errors;
pub mod messages;
pub mod models;
pub mod orchestrator;

// Re-export commonly used types
pub use errors::LunchError;
pub use messages::LunchMessages;
pub use models::{EventKey, EventPhase, EventWindow, GroupAssignment, ResolvedEvent};
pub use orchestrator::{
    LunchOrchestrator, LunchSettings, MembershipOutcome, PublishOutcome, ReminderSummary,
    ShowGroupsOutcome, StatusReport,
};
