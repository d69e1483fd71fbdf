// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Lunch lifecycle rules live in domains/lunch and only talk to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseRosterStore, BaseNotifier)

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slack::SlackMessage;

use crate::common::ParticipantId;
use crate::domains::lunch::models::{EventKey, GroupAssignment};

// =============================================================================
// Roster Store Trait (Infrastructure - persistence)
// =============================================================================

/// Per-event membership and published groups.
///
/// Every method touches a single event key. Implementations must make each
/// call atomic on its own; `save_assignment_if_absent` is the only primitive
/// that guards exactly-once publication.
#[async_trait]
pub trait BaseRosterStore: Send + Sync {
    /// Members of an event; empty when nobody has joined yet.
    async fn get_members(&self, key: EventKey) -> Result<BTreeSet<ParticipantId>>;

    /// Add a member. Adding an existing member is a no-op.
    async fn add_member(&self, key: EventKey, id: &ParticipantId) -> Result<()>;

    /// Remove a member. Removing an absent member is a no-op.
    async fn remove_member(&self, key: EventKey, id: &ParticipantId) -> Result<()>;

    async fn get_assignment(&self, key: EventKey) -> Result<Option<GroupAssignment>>;

    /// Store `assignment` unless one already exists for `key`.
    ///
    /// Returns false (and leaves the stored assignment untouched) if the
    /// event was already published.
    async fn save_assignment_if_absent(
        &self,
        key: EventKey,
        assignment: &GroupAssignment,
    ) -> Result<bool>;
}

// =============================================================================
// Notifier Trait (Infrastructure - outbound chat messages)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Post a message to a webhook or response URL.
    async fn send(&self, destination: &str, message: &SlackMessage) -> Result<()>;
}

// =============================================================================
// Clock Trait (Infrastructure - time)
// =============================================================================

pub trait BaseClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
