//! Database operations for the `walk_schedules` table.

use chrono::{DateTime, Utc};
use pawwalk_core::{CoreError, NewWalkSchedule, ScheduleStatus};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::DbError;

const SCHEDULE_COLUMNS: &str =
    "id, user_id, dog_id, target_dog_id, memo, scheduled_at, status, created_at, updated_at";

/// A row from the `walk_schedules` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WalkScheduleRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dog_id: Option<Uuid>,
    pub target_dog_id: Option<Uuid>,
    pub memo: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalkScheduleRow {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStatus`] for a label outside the enum.
    pub fn status(&self) -> Result<ScheduleStatus, CoreError> {
        self.status.parse()
    }
}

/// Create a schedule for `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Core`] if the schedule fails validation or names a
/// `dog_id` the user does not own, or [`DbError::Sqlx`] if a query fails.
pub async fn insert_walk_schedule(
    pool: &PgPool,
    user_id: Uuid,
    schedule: &NewWalkSchedule,
) -> Result<WalkScheduleRow, DbError> {
    schedule.validate(Utc::now())?;

    let mut tx = pool.begin().await?;
    check_dogs(&mut tx, user_id, schedule).await?;

    let row = sqlx::query_as::<_, WalkScheduleRow>(&format!(
        "INSERT INTO walk_schedules \
             (user_id, dog_id, target_dog_id, memo, scheduled_at, status) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {SCHEDULE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(schedule.dog_id)
    .bind(schedule.target_dog_id)
    .bind(schedule.memo())
    .bind(schedule.scheduled_at)
    .bind(schedule.status.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(schedule_id = %row.id, user_id = %user_id, "walk schedule created");
    Ok(row)
}

/// Replace the editable fields of a schedule.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the schedule does not exist,
/// [`DbError::Core`] on validation failure, or [`DbError::Sqlx`] if a query
/// fails.
pub async fn update_walk_schedule(
    pool: &PgPool,
    schedule_id: Uuid,
    schedule: &NewWalkSchedule,
) -> Result<WalkScheduleRow, DbError> {
    schedule.validate(Utc::now())?;

    let mut tx = pool.begin().await?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT user_id FROM walk_schedules WHERE id = $1 FOR UPDATE",
    )
    .bind(schedule_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(DbError::NotFound)?;

    check_dogs(&mut tx, user_id, schedule).await?;

    let row = sqlx::query_as::<_, WalkScheduleRow>(&format!(
        "UPDATE walk_schedules SET \
             dog_id        = $2, \
             target_dog_id = $3, \
             memo          = $4, \
             scheduled_at  = $5, \
             status        = $6, \
             updated_at    = NOW() \
         WHERE id = $1 \
         RETURNING {SCHEDULE_COLUMNS}"
    ))
    .bind(schedule_id)
    .bind(schedule.dog_id)
    .bind(schedule.target_dog_id)
    .bind(schedule.memo())
    .bind(schedule.scheduled_at)
    .bind(schedule.status.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

/// Fetch one schedule by id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_walk_schedule(
    pool: &PgPool,
    schedule_id: Uuid,
) -> Result<Option<WalkScheduleRow>, sqlx::Error> {
    sqlx::query_as::<_, WalkScheduleRow>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM walk_schedules WHERE id = $1"
    ))
    .bind(schedule_id)
    .fetch_optional(pool)
    .await
}

/// A user's schedules in time order.
///
/// Scheduled walks whose time has passed are marked done first, so callers
/// never see an overdue walk still labelled as upcoming.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if a query fails.
pub async fn list_schedules_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<WalkScheduleRow>, sqlx::Error> {
    let closed = sqlx::query(
        "UPDATE walk_schedules SET status = 'done', updated_at = NOW() \
         WHERE user_id = $1 AND status = 'scheduled' AND scheduled_at <= NOW()",
    )
    .bind(user_id)
    .execute(pool)
    .await?
    .rows_affected();

    if closed > 0 {
        tracing::debug!(user_id = %user_id, closed, "overdue walk schedules marked done");
    }

    sqlx::query_as::<_, WalkScheduleRow>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM walk_schedules \
         WHERE user_id = $1 \
         ORDER BY scheduled_at, id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Delete a schedule.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if nothing was deleted, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn delete_walk_schedule(pool: &PgPool, schedule_id: Uuid) -> Result<(), DbError> {
    let deleted = sqlx::query("DELETE FROM walk_schedules WHERE id = $1")
        .bind(schedule_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

// The user's own dog must be theirs; the companion dog only has to exist.
async fn check_dogs(
    conn: &mut PgConnection,
    user_id: Uuid,
    schedule: &NewWalkSchedule,
) -> Result<(), DbError> {
    if let Some(dog_id) = schedule.dog_id {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM dog_profiles WHERE id = $1 AND owner_id = $2)",
        )
        .bind(dog_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        if !owned {
            return Err(CoreError::Validation("dog_id must be one of your dogs".to_string()).into());
        }
    }

    if let Some(target) = schedule.target_dog_id {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM dog_profiles WHERE id = $1)",
        )
        .bind(target)
        .fetch_one(&mut *conn)
        .await?;
        if !exists {
            return Err(CoreError::Validation("target_dog_id does not exist".to_string()).into());
        }
    }

    Ok(())
}
