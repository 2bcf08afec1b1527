//! Database operations for the `dog_profiles` table.
//!
//! Every profile owns exactly one `dog_locations` row. Writes here keep that
//! row in step with the profile inside the same transaction, and deleting the
//! profile removes it.

use chrono::{DateTime, Utc};
use pawwalk_core::{Coordinate, NewDogProfile};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::homes::fetch_home;
use crate::locations::{refresh_denormalized_fields, write_location_for_profile};
use crate::DbError;

const PROFILE_COLUMNS: &str =
    "id, owner_id, name, breed, age, gender, image_url, created_at, updated_at";

/// A row from the `dog_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DogProfileRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Register a dog for `owner_id`.
///
/// The owner must already have a home location; the dog's location row is
/// seeded from it with `is_home = true`. Profile and location are written in
/// one transaction.
///
/// # Errors
///
/// Returns [`DbError::Core`] if the profile fails validation,
/// [`DbError::HomeLocationRequired`] if the owner has no home, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn insert_dog_profile(
    pool: &PgPool,
    owner_id: Uuid,
    profile: &NewDogProfile,
) -> Result<DogProfileRow, DbError> {
    profile.validate()?;

    let mut tx = pool.begin().await?;

    let home = fetch_home(&mut tx, owner_id)
        .await?
        .and_then(|row| row.coordinate())
        .ok_or(DbError::HomeLocationRequired)?;

    let row = insert_with_location(&mut tx, owner_id, profile, home, true).await?;
    tx.commit().await?;

    tracing::debug!(dog_id = %row.id, owner_id = %owner_id, "dog profile created");
    Ok(row)
}

/// Replace the editable fields of a profile.
///
/// The location row's denormalized columns are refreshed in the same
/// transaction.
///
/// # Errors
///
/// Returns [`DbError::Core`] if the profile fails validation,
/// [`DbError::NotFound`] if the dog does not exist, or [`DbError::Sqlx`] if a
/// query fails.
pub async fn update_dog_profile(
    pool: &PgPool,
    dog_id: Uuid,
    profile: &NewDogProfile,
) -> Result<DogProfileRow, DbError> {
    profile.validate()?;

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, DogProfileRow>(&format!(
        "UPDATE dog_profiles SET \
             name       = $2, \
             breed      = $3, \
             age        = $4, \
             gender     = $5, \
             image_url  = $6, \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(dog_id)
    .bind(profile.name.trim())
    .bind(profile.breed.trim())
    .bind(profile.age)
    .bind(profile.gender.trim())
    .bind(&profile.image_url)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(DbError::NotFound)?;

    refresh_denormalized_fields(&mut tx, &row).await?;
    tx.commit().await?;

    Ok(row)
}

/// Delete a profile.
///
/// Its location row, pending walk requests and diary entries go with it via
/// `ON DELETE CASCADE`; schedules that named the dog keep their row with the
/// reference cleared.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the dog does not exist, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn delete_dog_profile(pool: &PgPool, dog_id: Uuid) -> Result<(), DbError> {
    let owner_id = sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM dog_profiles WHERE id = $1 RETURNING owner_id",
    )
    .bind(dog_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    tracing::info!(dog_id = %dog_id, owner_id = %owner_id, "dog profile deleted");
    Ok(())
}

/// Fetch a single profile by id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_dog_profile(
    pool: &PgPool,
    dog_id: Uuid,
) -> Result<Option<DogProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, DogProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM dog_profiles WHERE id = $1"
    ))
    .bind(dog_id)
    .fetch_optional(pool)
    .await
}

/// List an owner's dogs, newest first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_dogs_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<DogProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, DogProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM dog_profiles \
         WHERE owner_id = $1 \
         ORDER BY created_at DESC, id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// The owner's most recently registered dog, if any.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_most_recent_dog_for_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Option<DogProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, DogProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM dog_profiles \
         WHERE owner_id = $1 \
         ORDER BY created_at DESC, id \
         LIMIT 1"
    ))
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn insert_with_location(
    conn: &mut PgConnection,
    owner_id: Uuid,
    profile: &NewDogProfile,
    location: Coordinate,
    is_home: bool,
) -> Result<DogProfileRow, sqlx::Error> {
    let row = sqlx::query_as::<_, DogProfileRow>(&format!(
        "INSERT INTO dog_profiles (owner_id, name, breed, age, gender, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(owner_id)
    .bind(profile.name.trim())
    .bind(profile.breed.trim())
    .bind(profile.age)
    .bind(profile.gender.trim())
    .bind(&profile.image_url)
    .fetch_one(&mut *conn)
    .await?;

    write_location_for_profile(conn, &row, location, is_home).await?;
    Ok(row)
}

pub(crate) async fn update_in_place(
    conn: &mut PgConnection,
    dog_id: Uuid,
    profile: &NewDogProfile,
    location: Coordinate,
    is_home: bool,
) -> Result<DogProfileRow, sqlx::Error> {
    let row = sqlx::query_as::<_, DogProfileRow>(&format!(
        "UPDATE dog_profiles SET \
             breed      = $2, \
             age        = $3, \
             gender     = $4, \
             image_url  = $5, \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(dog_id)
    .bind(profile.breed.trim())
    .bind(profile.age)
    .bind(profile.gender.trim())
    .bind(&profile.image_url)
    .fetch_one(&mut *conn)
    .await?;

    write_location_for_profile(conn, &row, location, is_home).await?;
    Ok(row)
}
