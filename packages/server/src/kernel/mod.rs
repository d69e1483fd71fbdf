//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PostgresRosterStore, ServerDeps, SlackNotifier, SystemClock};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{
    FixedClock, InMemoryRosterStore, MockNotifier, SentMessage, StoreCallCounts, TestDependencies,
};
pub use traits::*;
