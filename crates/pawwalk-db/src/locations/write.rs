//! Write operations for the `dog_locations` table.

use pawwalk_core::Coordinate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::types::DogLocationRow;
use crate::dogs::DogProfileRow;
use crate::DbError;

/// Record a new position for `dog_id`, replacing the previous one.
///
/// The row's display columns are refreshed from the profile in the same
/// statement and `is_home` is cleared.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the dog does not exist, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn upsert_dog_location(
    pool: &PgPool,
    dog_id: Uuid,
    coordinate: Coordinate,
) -> Result<DogLocationRow, DbError> {
    let row = sqlx::query_as::<_, DogLocationRow>(
        "INSERT INTO dog_locations \
             (dog_id, owner_id, latitude, longitude, dog_name, breed, age, image_url, is_home) \
         SELECT id, owner_id, $2, $3, name, breed, age::text, image_url, FALSE \
         FROM dog_profiles WHERE id = $1 \
         ON CONFLICT (dog_id) DO UPDATE SET \
             latitude   = EXCLUDED.latitude, \
             longitude  = EXCLUDED.longitude, \
             dog_name   = EXCLUDED.dog_name, \
             breed      = EXCLUDED.breed, \
             age        = EXCLUDED.age, \
             image_url  = EXCLUDED.image_url, \
             is_home    = FALSE, \
             updated_at = NOW() \
         RETURNING id, dog_id, owner_id, latitude, longitude, dog_name, breed, age, \
                   image_url, is_home, updated_at",
    )
    .bind(dog_id)
    .bind(coordinate.latitude)
    .bind(coordinate.longitude)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Insert or overwrite the location row for a freshly written profile.
pub(crate) async fn write_location_for_profile(
    conn: &mut PgConnection,
    profile: &DogProfileRow,
    coordinate: Coordinate,
    is_home: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO dog_locations \
             (dog_id, owner_id, latitude, longitude, dog_name, breed, age, image_url, is_home) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (dog_id) DO UPDATE SET \
             latitude   = EXCLUDED.latitude, \
             longitude  = EXCLUDED.longitude, \
             dog_name   = EXCLUDED.dog_name, \
             breed      = EXCLUDED.breed, \
             age        = EXCLUDED.age, \
             image_url  = EXCLUDED.image_url, \
             is_home    = EXCLUDED.is_home, \
             updated_at = NOW()",
    )
    .bind(profile.id)
    .bind(profile.owner_id)
    .bind(coordinate.latitude)
    .bind(coordinate.longitude)
    .bind(&profile.name)
    .bind(&profile.breed)
    .bind(profile.age.map(|age| age.to_string()))
    .bind(&profile.image_url)
    .bind(is_home)
    .execute(conn)
    .await?;
    Ok(())
}

/// Copy a profile's display columns onto its location row.
pub(crate) async fn refresh_denormalized_fields(
    conn: &mut PgConnection,
    profile: &DogProfileRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE dog_locations SET \
             dog_name   = $2, \
             breed      = $3, \
             age        = $4, \
             image_url  = $5 \
         WHERE dog_id = $1",
    )
    .bind(profile.id)
    .bind(&profile.name)
    .bind(&profile.breed)
    .bind(profile.age.map(|age| age.to_string()))
    .bind(&profile.image_url)
    .execute(conn)
    .await?;
    Ok(())
}
