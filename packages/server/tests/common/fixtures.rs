//! Test fixtures for building a lunch orchestrator over in-memory collaborators.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};
use lunch_core::domains::lunch::{EventKey, EventWindow, LunchOrchestrator, LunchSettings};
use lunch_core::kernel::TestDependencies;

pub const PUBLISH_CHANNEL_URL: &str = "https://hooks.slack.com/services/T000/B000/publish";
pub const PUBLISH_CHANNEL_ID: &str = "<#C0LUNCH|social_lunch>";
pub const SLASH_COMMAND: &str = "/social-lunch";

pub fn event_offset() -> FixedOffset {
    FixedOffset::east_opt(2 * 3600).unwrap()
}

/// Lunch every Friday, closing at 11:00 local time.
pub fn friday_settings() -> LunchSettings {
    LunchSettings {
        window: EventWindow::new(Weekday::Fri, 11, event_offset()),
        reminder_hour: 9,
        publish_channel_url: PUBLISH_CHANNEL_URL.to_string(),
        publish_channel_id: PUBLISH_CHANNEL_ID.to_string(),
        slash_command: SLASH_COMMAND.to_string(),
    }
}

/// Local wall-clock time in the lunch offset, as a UTC instant.
pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    event_offset()
        .with_ymd_and_hms(y, m, d, h, min, s)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn key(y: i32, m: u32, d: u32) -> EventKey {
    EventKey::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

// 2018-01-04 is a Thursday; 2018-01-05 and 2018-01-12 are Fridays.

pub fn thursday_morning() -> DateTime<Utc> {
    local(2018, 1, 4, 10, 0, 0)
}

pub fn friday_cutoff() -> DateTime<Utc> {
    local(2018, 1, 5, 11, 0, 0)
}

pub fn this_friday() -> EventKey {
    key(2018, 1, 5)
}

pub fn next_friday() -> EventKey {
    key(2018, 1, 12)
}

/// An orchestrator plus handles on its mocks.
pub struct TestLunch {
    pub deps: TestDependencies,
    pub orchestrator: Arc<LunchOrchestrator>,
}

impl TestLunch {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::with_deps(TestDependencies::new(now))
    }

    pub fn with_deps(deps: TestDependencies) -> Self {
        let orchestrator = Arc::new(LunchOrchestrator::new(deps.deps(), friday_settings()));
        Self { deps, orchestrator }
    }

    pub fn set_time(&self, now: DateTime<Utc>) {
        self.deps.clock.set(now);
    }
}
