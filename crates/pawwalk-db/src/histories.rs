//! Database operations for the `dog_histories` walk diary.

use chrono::{DateTime, NaiveDate, Utc};
use pawwalk_core::NewDogHistory;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const HISTORY_COLUMNS: &str =
    "id, dog_id, entry_date, memo, hashtags, image_urls, created_at, updated_at";

/// A row from the `dog_histories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DogHistoryRow {
    pub id: Uuid,
    pub dog_id: Uuid,
    pub entry_date: NaiveDate,
    pub memo: Option<String>,
    pub hashtags: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Add a diary entry for `dog_id`.
///
/// # Errors
///
/// Returns [`DbError::Core`] if the entry fails validation,
/// [`DbError::NotFound`] if the dog does not exist, or [`DbError::Sqlx`] if a
/// query fails.
pub async fn insert_dog_history(
    pool: &PgPool,
    dog_id: Uuid,
    entry: &NewDogHistory,
) -> Result<DogHistoryRow, DbError> {
    entry.validate()?;

    // INSERT ... SELECT yields no row when the dog is missing.
    let row = sqlx::query_as::<_, DogHistoryRow>(&format!(
        "INSERT INTO dog_histories (dog_id, entry_date, memo, hashtags, image_urls) \
         SELECT id, $2, $3, $4, $5 FROM dog_profiles WHERE id = $1 \
         RETURNING {HISTORY_COLUMNS}"
    ))
    .bind(dog_id)
    .bind(entry.entry_date)
    .bind(entry.memo())
    .bind(entry.normalized_hashtags())
    .bind(entry.trimmed_image_urls())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    tracing::debug!(history_id = %row.id, dog_id = %dog_id, "diary entry created");
    Ok(row)
}

/// Replace the contents of a diary entry.
///
/// # Errors
///
/// Returns [`DbError::Core`] on validation failure, [`DbError::NotFound`] if
/// the entry does not exist, or [`DbError::Sqlx`] if the query fails.
pub async fn update_dog_history(
    pool: &PgPool,
    history_id: Uuid,
    entry: &NewDogHistory,
) -> Result<DogHistoryRow, DbError> {
    entry.validate()?;

    sqlx::query_as::<_, DogHistoryRow>(&format!(
        "UPDATE dog_histories SET \
             entry_date = $2, \
             memo       = $3, \
             hashtags   = $4, \
             image_urls = $5, \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {HISTORY_COLUMNS}"
    ))
    .bind(history_id)
    .bind(entry.entry_date)
    .bind(entry.memo())
    .bind(entry.normalized_hashtags())
    .bind(entry.trimmed_image_urls())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Fetch one diary entry by id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_dog_history(
    pool: &PgPool,
    history_id: Uuid,
) -> Result<Option<DogHistoryRow>, sqlx::Error> {
    sqlx::query_as::<_, DogHistoryRow>(&format!(
        "SELECT {HISTORY_COLUMNS} FROM dog_histories WHERE id = $1"
    ))
    .bind(history_id)
    .fetch_optional(pool)
    .await
}

/// A dog's diary, most recent entry date first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_histories_for_dog(
    pool: &PgPool,
    dog_id: Uuid,
) -> Result<Vec<DogHistoryRow>, sqlx::Error> {
    sqlx::query_as::<_, DogHistoryRow>(&format!(
        "SELECT {HISTORY_COLUMNS} FROM dog_histories \
         WHERE dog_id = $1 \
         ORDER BY entry_date DESC, created_at DESC, id"
    ))
    .bind(dog_id)
    .fetch_all(pool)
    .await
}

/// Delete a diary entry.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if nothing was deleted, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn delete_dog_history(pool: &PgPool, history_id: Uuid) -> Result<(), DbError> {
    let deleted = sqlx::query("DELETE FROM dog_histories WHERE id = $1")
        .bind(history_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
