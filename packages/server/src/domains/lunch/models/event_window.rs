use std::fmt;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Identifies one week's lunch by its calendar date.
///
/// Displayed as `YYYYMMDD`, which is also how it appears in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKey(NaiveDate);

impl EventKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPhase {
    /// Joining and leaving are allowed.
    Open,
    /// Cutoff has passed on the lunch day; this week's roster is frozen.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEvent {
    pub key: EventKey,
    pub phase: EventPhase,
}

impl ResolvedEvent {
    pub fn is_closed(&self) -> bool {
        self.phase == EventPhase::Closed
    }
}

/// Weekly lunch window: a weekday plus the local hour at which it closes.
///
/// All weekday and hour comparisons happen in `offset`, the local time of
/// the participants; callers pass UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    weekday: Weekday,
    cutoff_hour: u32,
    offset: FixedOffset,
}

impl EventWindow {
    pub fn new(weekday: Weekday, cutoff_hour: u32, offset: FixedOffset) -> Self {
        Self {
            weekday,
            cutoff_hour,
            offset,
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Resolve the lunch that join/leave/status requests target at `now`.
    ///
    /// Before the cutoff this is the upcoming lunch day (today, if today is
    /// the lunch day). From the cutoff instant onwards on the lunch day it is
    /// the following week's lunch, while the phase reports `Closed`.
    pub fn resolve(&self, now: DateTime<Utc>) -> ResolvedEvent {
        let local = now.with_timezone(&self.offset);
        let today = local.date_naive();

        if self.is_closed_at(&local) {
            return ResolvedEvent {
                key: EventKey(today + Days::new(7)),
                phase: EventPhase::Closed,
            };
        }

        let ahead = days_between(today.weekday(), self.weekday);
        ResolvedEvent {
            key: EventKey(today + Days::new(ahead)),
            phase: EventPhase::Open,
        }
    }

    pub fn phase(&self, now: DateTime<Utc>) -> EventPhase {
        self.resolve(now).phase
    }

    /// Key of the most recent lunch whose cutoff is at or before `now`.
    pub fn last_closed_key(&self, now: DateTime<Utc>) -> EventKey {
        let local = now.with_timezone(&self.offset);
        let today = local.date_naive();

        if self.is_closed_at(&local) {
            return EventKey(today);
        }

        let back = match days_between(self.weekday, today.weekday()) {
            0 => 7,
            n => n,
        };
        EventKey(today - Days::new(back))
    }

    pub fn is_event_day(&self, now: DateTime<Utc>) -> bool {
        now.with_timezone(&self.offset).weekday() == self.weekday
    }

    fn is_closed_at(&self, local: &DateTime<FixedOffset>) -> bool {
        local.weekday() == self.weekday && local.hour() >= self.cutoff_hour
    }
}

/// Days to move forward from `from` to reach the next `to` (0 when equal).
fn days_between(from: Weekday, to: Weekday) -> u64 {
    let from = from.num_days_from_monday();
    let to = to.num_days_from_monday();
    u64::from((to + 7 - from) % 7)
}
