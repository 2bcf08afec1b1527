//! Database operations for the `walk_requests` table.

use chrono::{DateTime, Utc};
use pawwalk_core::{validate_walk_parties, CoreError, WalkRequestStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const REQUEST_COLUMNS: &str =
    "id, from_user_id, to_user_id, dog_id, status, created_at, responded_at";

/// Input for sending a walk request.
///
/// `dog_id` is the requester's dog that would join the walk. When `None`, the
/// requester's most recently registered dog is used.
#[derive(Debug, Clone)]
pub struct NewWalkRequest {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub dog_id: Option<Uuid>,
}

/// A row from the `walk_requests` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WalkRequestRow {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub dog_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl WalkRequestRow {
    /// Parse the stored status label.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStatus`] for a label outside the enum.
    pub fn status(&self) -> Result<WalkRequestStatus, CoreError> {
        self.status.parse()
    }
}

/// A pending request addressed to a user, joined with the requester's dog.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingWalkRequestRow {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub dog_id: Uuid,
    pub dog_name: String,
    pub dog_breed: Option<String>,
    pub dog_age: Option<i32>,
    pub dog_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Send a walk request, replacing any earlier pending one with the same
/// requester, recipient and dog.
///
/// # Errors
///
/// Returns [`DbError::Core`] if the requester targets themselves, has no dog,
/// or names a dog they do not own; [`DbError::Sqlx`] if a query fails.
pub async fn create_walk_request(
    pool: &PgPool,
    request: &NewWalkRequest,
) -> Result<WalkRequestRow, DbError> {
    validate_walk_parties(
        &request.from_user_id.to_string(),
        &request.to_user_id.to_string(),
    )?;

    let mut tx = pool.begin().await?;

    let dog_id: Option<Uuid> = match request.dog_id {
        Some(dog_id) => {
            sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM dog_profiles WHERE id = $1 AND owner_id = $2",
            )
            .bind(dog_id)
            .bind(request.from_user_id)
            .fetch_optional(&mut *tx)
            .await?
        }
        None => {
            sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM dog_profiles WHERE owner_id = $1 \
                 ORDER BY created_at DESC, id LIMIT 1",
            )
            .bind(request.from_user_id)
            .fetch_optional(&mut *tx)
            .await?
        }
    };
    let dog_id = dog_id.ok_or_else(|| {
        CoreError::Validation("requester must register a dog of their own first".to_string())
    })?;

    // A pending request for the same triple is replaced in place: new id, new
    // timestamp. Racing creates serialize on the partial unique index.
    let row = sqlx::query_as::<_, WalkRequestRow>(&format!(
        "INSERT INTO walk_requests (from_user_id, to_user_id, dog_id, status) \
         VALUES ($1, $2, $3, 'pending') \
         ON CONFLICT (from_user_id, to_user_id, dog_id) WHERE status = 'pending' \
         DO UPDATE SET id = gen_random_uuid(), created_at = NOW() \
         RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(request.from_user_id)
    .bind(request.to_user_id)
    .bind(dog_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        request_id = %row.id,
        from_user_id = %row.from_user_id,
        to_user_id = %row.to_user_id,
        "walk request created"
    );
    Ok(row)
}

/// Pending requests addressed to `user_id`, newest first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_pending_requests_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PendingWalkRequestRow>, sqlx::Error> {
    sqlx::query_as::<_, PendingWalkRequestRow>(
        "SELECT wr.id, wr.from_user_id, wr.dog_id, \
                d.name AS dog_name, d.breed AS dog_breed, d.age AS dog_age, \
                d.image_url AS dog_image_url, wr.created_at \
         FROM walk_requests wr \
         JOIN dog_profiles d ON d.id = wr.dog_id \
         WHERE wr.to_user_id = $1 AND wr.status = 'pending' \
         ORDER BY wr.created_at DESC, wr.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Fetch one request by id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_walk_request(
    pool: &PgPool,
    request_id: Uuid,
) -> Result<Option<WalkRequestRow>, sqlx::Error> {
    sqlx::query_as::<_, WalkRequestRow>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM walk_requests WHERE id = $1"
    ))
    .bind(request_id)
    .fetch_optional(pool)
    .await
}

/// Accept or reject a pending request.
///
/// The row is locked for the duration of the check so two concurrent
/// responses cannot both succeed.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the request does not exist,
/// [`DbError::Core`] if the request is no longer pending or `next` is not a
/// response, or [`DbError::Sqlx`] if a query fails.
pub async fn respond_to_walk_request(
    pool: &PgPool,
    request_id: Uuid,
    next: WalkRequestStatus,
) -> Result<WalkRequestRow, DbError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, WalkRequestRow>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM walk_requests WHERE id = $1 FOR UPDATE"
    ))
    .bind(request_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(DbError::NotFound)?;

    let next = current.status()?.transition_to(next)?;

    let row = sqlx::query_as::<_, WalkRequestRow>(&format!(
        "UPDATE walk_requests SET status = $2, responded_at = NOW() \
         WHERE id = $1 \
         RETURNING {REQUEST_COLUMNS}"
    ))
    .bind(request_id)
    .bind(next.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(request_id = %row.id, status = %next, "walk request answered");
    Ok(row)
}
