//! Server dependencies for the lunch domain (using traits for testability)
//!
//! This module provides the central dependency container handed to the
//! orchestrator. All external services use trait abstractions to enable testing.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slack::{SlackMessage, SlackService};
use sqlx::PgPool;

use crate::common::ParticipantId;
use crate::domains::lunch::models::{EventKey, GroupAssignment, LunchGroups, LunchParticipant};
use crate::kernel::{BaseClock, BaseNotifier, BaseRosterStore};

// =============================================================================
// SlackService Adapter (implements BaseNotifier trait)
// =============================================================================

/// Wrapper around SlackService that implements BaseNotifier trait
pub struct SlackNotifier(pub Arc<SlackService>);

impl SlackNotifier {
    pub fn new(service: Arc<SlackService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseNotifier for SlackNotifier {
    async fn send(&self, destination: &str, message: &SlackMessage) -> Result<()> {
        self.0
            .post_message(destination, message)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// Postgres Roster Store (implements BaseRosterStore trait)
// =============================================================================

/// Roster store backed by the `lunch_participants` and
/// `lunch_group_assignments` tables.
#[derive(Clone)]
pub struct PostgresRosterStore {
    pool: PgPool,
}

impl PostgresRosterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRosterStore for PostgresRosterStore {
    async fn get_members(&self, key: EventKey) -> Result<BTreeSet<ParticipantId>> {
        let participants = LunchParticipant::find_for_event(key, &self.pool).await?;
        Ok(participants
            .into_iter()
            .map(|p| ParticipantId::from(p.user_id))
            .collect())
    }

    async fn add_member(&self, key: EventKey, id: &ParticipantId) -> Result<()> {
        LunchParticipant::insert(key, id, &self.pool).await
    }

    async fn remove_member(&self, key: EventKey, id: &ParticipantId) -> Result<()> {
        LunchParticipant::delete(key, id, &self.pool).await
    }

    async fn get_assignment(&self, key: EventKey) -> Result<Option<GroupAssignment>> {
        let row = LunchGroups::find_for_event(key, &self.pool).await?;
        Ok(row.map(LunchGroups::into_assignment))
    }

    async fn save_assignment_if_absent(
        &self,
        key: EventKey,
        assignment: &GroupAssignment,
    ) -> Result<bool> {
        LunchGroups::insert_if_absent(key, assignment, &self.pool).await
    }
}

// =============================================================================
// System clock
// =============================================================================

pub struct SystemClock;

impl BaseClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Collaborators of the lunch orchestrator (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub roster_store: Arc<dyn BaseRosterStore>,
    pub notifier: Arc<dyn BaseNotifier>,
    pub clock: Arc<dyn BaseClock>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        roster_store: Arc<dyn BaseRosterStore>,
        notifier: Arc<dyn BaseNotifier>,
        clock: Arc<dyn BaseClock>,
    ) -> Self {
        Self {
            roster_store,
            notifier,
            clock,
        }
    }

    /// Production wiring: Postgres roster, Slack notifications, wall clock.
    pub fn production(pool: PgPool, slack: Arc<SlackService>) -> Self {
        Self::new(
            Arc::new(PostgresRosterStore::new(pool)),
            Arc::new(SlackNotifier::new(slack)),
            Arc::new(SystemClock),
        )
    }
}
