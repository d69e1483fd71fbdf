use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use super::{EventKey, GroupAssignment};
use crate::common::ParticipantId;

/// One participant of one week's lunch - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LunchParticipant {
    pub event_date: NaiveDate,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

impl LunchParticipant {
    /// Find everyone who joined the given lunch
    pub async fn find_for_event(key: EventKey, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM lunch_participants WHERE event_date = $1 ORDER BY joined_at ASC",
        )
        .bind(key.date())
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Add a participant; joining twice keeps the original row
    pub async fn insert(key: EventKey, id: &ParticipantId, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO lunch_participants (event_date, user_id)
             VALUES ($1, $2)
             ON CONFLICT (event_date, user_id) DO NOTHING",
        )
        .bind(key.date())
        .bind(id.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(key: EventKey, id: &ParticipantId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM lunch_participants WHERE event_date = $1 AND user_id = $2")
            .bind(key.date())
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// Published groups of one week's lunch - SQL persistence layer
///
/// The row's existence is what marks the lunch as published.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LunchGroups {
    pub event_date: NaiveDate,
    pub groups: Json<GroupAssignment>,
    pub published_at: DateTime<Utc>,
}

impl LunchGroups {
    pub async fn find_for_event(key: EventKey, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM lunch_group_assignments WHERE event_date = $1")
            .bind(key.date())
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert the assignment unless the lunch already has one.
    ///
    /// Returns true if this call created the row.
    pub async fn insert_if_absent(
        key: EventKey,
        assignment: &GroupAssignment,
        pool: &PgPool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO lunch_group_assignments (event_date, groups)
             VALUES ($1, $2)
             ON CONFLICT (event_date) DO NOTHING",
        )
        .bind(key.date())
        .bind(Json(assignment))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub fn into_assignment(self) -> GroupAssignment {
        self.groups.0
    }
}
