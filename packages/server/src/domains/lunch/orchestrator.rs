//! Weekly lunch lifecycle: join, leave, status, publish and reminders.
//!
//! The orchestrator keeps no state between calls. Every operation resolves
//! the current lunch from the clock and goes straight to the roster store,
//! so any number of instances can serve the same store.
//!
//! ```text
//! join / leave / status ──► EventWindow::resolve(now) ──► roster store
//!
//! publish trigger ──► existing assignment? ──yes──► no-op
//!                            │ no
//!                            └─► roster ─► partition ─► save_if_absent ─► notify
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};

use super::actions::partition;
use super::errors::{store_unavailable, LunchError};
use super::messages::LunchMessages;
use super::models::{EventKey, EventWindow, GroupAssignment};
use crate::common::ParticipantId;
use crate::kernel::{BaseClock, BaseNotifier, BaseRosterStore, ServerDeps};

/// Static configuration of the weekly lunch.
#[derive(Debug, Clone)]
pub struct LunchSettings {
    pub window: EventWindow,
    /// Local hour of the lunch-day reminder.
    pub reminder_hour: u32,
    /// Incoming-webhook URL of the channel groups are published to.
    pub publish_channel_url: String,
    /// Channel reference shown in message texts, e.g. `<#C123|lunch>`.
    pub publish_channel_id: String,
    /// Slash command users are told to run, e.g. `/social-lunch`.
    pub slash_command: String,
}

/// Answer to a status request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// The upcoming lunch still accepts changes.
    Open {
        event: EventKey,
        participant_count: usize,
        is_member: bool,
    },
    /// This week's groups are out; `event` is the lunch that just closed.
    /// `groups_formed` is false when too few people joined for a group.
    Published {
        event: EventKey,
        was_member: bool,
        groups_formed: bool,
    },
}

/// Result of a join or leave request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// The roster was updated.
    Updated {
        event: EventKey,
        participant_count: usize,
        is_member: bool,
    },
    /// The request arrived after the cutoff; nothing changed.
    TooLate {
        event: EventKey,
        was_member: bool,
        groups_formed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        event: EventKey,
        assignment: GroupAssignment,
    },
    /// Groups already existed for the lunch; nothing was computed or sent.
    AlreadyPublished { event: EventKey },
}

impl PublishOutcome {
    pub fn event(&self) -> EventKey {
        match self {
            PublishOutcome::Published { event, .. } | PublishOutcome::AlreadyPublished { event } => {
                *event
            }
        }
    }

    pub fn was_published_now(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }
}

/// Result of re-sending published groups on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowGroupsOutcome {
    Sent { event: EventKey, group_count: usize },
    /// The window is still open, or the publish run never stored groups.
    NotPublished { event: EventKey },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSummary {
    pub event: EventKey,
    pub participant_count: usize,
    pub is_today: bool,
}

/// The lunch state machine over injected store, notifier and clock.
pub struct LunchOrchestrator {
    store: Arc<dyn BaseRosterStore>,
    notifier: Arc<dyn BaseNotifier>,
    clock: Arc<dyn BaseClock>,
    settings: LunchSettings,
    messages: LunchMessages,
}

impl LunchOrchestrator {
    pub fn new(deps: ServerDeps, settings: LunchSettings) -> Self {
        let messages = LunchMessages::new(
            settings.publish_channel_id.clone(),
            settings.window.cutoff_hour(),
            settings.slash_command.clone(),
        );
        Self {
            store: deps.roster_store,
            notifier: deps.notifier,
            clock: deps.clock,
            settings,
            messages,
        }
    }

    pub fn settings(&self) -> &LunchSettings {
        &self.settings
    }

    pub fn window(&self) -> &EventWindow {
        &self.settings.window
    }

    pub fn messages(&self) -> &LunchMessages {
        &self.messages
    }

    pub fn clock(&self) -> &dyn BaseClock {
        self.clock.as_ref()
    }

    pub async fn status(&self, user: &ParticipantId) -> Result<StatusReport, LunchError> {
        let now = self.clock.now();
        let resolved = self.window().resolve(now);

        if resolved.is_closed() {
            let event = self.window().last_closed_key(now);
            let (was_member, groups_formed) = self.closed_event(event, user, "status").await?;
            return Ok(StatusReport::Published {
                event,
                was_member,
                groups_formed,
            });
        }

        let members = self
            .store
            .get_members(resolved.key)
            .await
            .map_err(store_unavailable("status"))?;

        Ok(StatusReport::Open {
            event: resolved.key,
            participant_count: members.len(),
            is_member: members.contains(user),
        })
    }

    pub async fn join(&self, user: &ParticipantId) -> Result<MembershipOutcome, LunchError> {
        self.change_membership(user, true).await
    }

    pub async fn leave(&self, user: &ParticipantId) -> Result<MembershipOutcome, LunchError> {
        self.change_membership(user, false).await
    }

    async fn change_membership(
        &self,
        user: &ParticipantId,
        join: bool,
    ) -> Result<MembershipOutcome, LunchError> {
        let operation = if join { "join" } else { "leave" };
        let now = self.clock.now();
        let resolved = self.window().resolve(now);

        if resolved.is_closed() {
            let event = self.window().last_closed_key(now);
            info!(user = %user, event = %event, operation, "Rejected membership change after cutoff");
            let (was_member, groups_formed) = self.closed_event(event, user, operation).await?;
            return Ok(MembershipOutcome::TooLate {
                event,
                was_member,
                groups_formed,
            });
        }

        // A publish reading the roster between the phase check above and this
        // write may or may not see the change.
        let write = if join {
            self.store.add_member(resolved.key, user).await
        } else {
            self.store.remove_member(resolved.key, user).await
        };
        write.map_err(store_unavailable(operation))?;

        let members = self
            .store
            .get_members(resolved.key)
            .await
            .map_err(store_unavailable(operation))?;

        info!(
            user = %user,
            event = %resolved.key,
            participants = members.len(),
            "{}",
            if join { "Participant joined" } else { "Participant left" }
        );

        Ok(MembershipOutcome::Updated {
            event: resolved.key,
            participant_count: members.len(),
            is_member: members.contains(user),
        })
    }

    /// Freeze the roster of `event` into groups and announce them.
    ///
    /// Safe to call any number of times, concurrently or after a crash: the
    /// first stored assignment wins and later calls neither recompute nor
    /// re-announce. A failed announcement is logged and leaves the stored
    /// groups in place.
    pub async fn publish(&self, event: EventKey) -> Result<PublishOutcome, LunchError> {
        let existing = self
            .store
            .get_assignment(event)
            .await
            .map_err(store_unavailable("publish"))?;
        if existing.is_some() {
            info!(event = %event, "Groups already published, skipping");
            return Ok(PublishOutcome::AlreadyPublished { event });
        }

        let members = self
            .store
            .get_members(event)
            .await
            .map_err(store_unavailable("publish"))?;
        let ids: Vec<ParticipantId> = members.into_iter().collect();
        let assignment = GroupAssignment::new(partition(&ids));

        let stored = self
            .store
            .save_assignment_if_absent(event, &assignment)
            .await
            .map_err(store_unavailable("publish"))?;
        if !stored {
            info!(event = %event, "Another publish stored groups first, skipping");
            return Ok(PublishOutcome::AlreadyPublished { event });
        }

        info!(
            event = %event,
            participants = ids.len(),
            groups = assignment.len(),
            "Lunch groups published"
        );

        let message = self.messages.group_list(event, &assignment);
        if let Err(e) = self
            .notifier
            .send(&self.settings.publish_channel_url, &message)
            .await
        {
            error!(event = %event, error = %e, "Failed to announce lunch groups");
        }

        Ok(PublishOutcome::Published { event, assignment })
    }

    /// Publish the lunch whose window most recently closed.
    pub async fn publish_due(&self) -> Result<PublishOutcome, LunchError> {
        let event = self.window().last_closed_key(self.clock.now());
        self.publish(event).await
    }

    /// Post the weekly reminder for the upcoming lunch to the publish channel.
    pub async fn send_reminder(&self) -> Result<ReminderSummary, LunchError> {
        let now = self.clock.now();
        let resolved = self.window().resolve(now);
        let members = self
            .store
            .get_members(resolved.key)
            .await
            .map_err(store_unavailable("reminder"))?;

        let summary = ReminderSummary {
            event: resolved.key,
            participant_count: members.len(),
            is_today: !resolved.is_closed() && self.window().is_event_day(now),
        };

        let message =
            self.messages
                .reminder(summary.event, summary.participant_count, summary.is_today);
        if let Err(e) = self
            .notifier
            .send(&self.settings.publish_channel_url, &message)
            .await
        {
            error!(event = %summary.event, error = %e, "Failed to send lunch reminder");
        } else {
            info!(event = %summary.event, participants = summary.participant_count, "Lunch reminder sent");
        }

        Ok(summary)
    }

    /// Re-send this week's published groups to the publish channel.
    pub async fn show_groups(&self) -> Result<ShowGroupsOutcome, LunchError> {
        let now = self.clock.now();
        let resolved = self.window().resolve(now);
        if !resolved.is_closed() {
            return Ok(ShowGroupsOutcome::NotPublished {
                event: resolved.key,
            });
        }

        let event = self.window().last_closed_key(now);
        let Some(assignment) = self
            .store
            .get_assignment(event)
            .await
            .map_err(store_unavailable("groups"))?
        else {
            warn!(event = %event, "Groups requested but none were stored");
            return Ok(ShowGroupsOutcome::NotPublished { event });
        };

        let message = self.messages.group_list(event, &assignment);
        if let Err(e) = self
            .notifier
            .send(&self.settings.publish_channel_url, &message)
            .await
        {
            error!(event = %event, error = %e, "Failed to re-send lunch groups");
        }

        Ok(ShowGroupsOutcome::Sent {
            event,
            group_count: assignment.len(),
        })
    }

    /// Whether `user` was in the frozen roster of `event`, and whether any
    /// groups came out of it. Groups not stored yet count as formed.
    async fn closed_event(
        &self,
        event: EventKey,
        user: &ParticipantId,
        operation: &'static str,
    ) -> Result<(bool, bool), LunchError> {
        let members = self
            .store
            .get_members(event)
            .await
            .map_err(store_unavailable(operation))?;
        let assignment = self
            .store
            .get_assignment(event)
            .await
            .map_err(store_unavailable(operation))?;
        let groups_formed = assignment.map_or(true, |a| !a.is_empty());
        Ok((members.contains(user), groups_formed))
    }
}
