//! Read operations for the `dog_locations` table.

use sqlx::PgPool;
use uuid::Uuid;

use super::types::DogLocationRow;

const LOCATION_COLUMNS: &str = "id, dog_id, owner_id, latitude, longitude, dog_name, breed, age, \
                                image_url, is_home, updated_at";

/// Fetch the location row for a single dog.
///
/// Returns `None` if the dog has no location row.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_dog_location(
    pool: &PgPool,
    dog_id: Uuid,
) -> Result<Option<DogLocationRow>, sqlx::Error> {
    sqlx::query_as::<_, DogLocationRow>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM dog_locations WHERE dog_id = $1"
    ))
    .bind(dog_id)
    .fetch_optional(pool)
    .await
}

/// List every dog location a nearby search may consider.
///
/// When `exclude_owner` is set, that owner's dogs are dropped in SQL; the
/// ranking layer applies the same exclusion again on its side. Rows come back
/// oldest-first by `updated_at` so ties in distance keep a deterministic order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_candidate_locations(
    pool: &PgPool,
    exclude_owner: Option<Uuid>,
) -> Result<Vec<DogLocationRow>, sqlx::Error> {
    sqlx::query_as::<_, DogLocationRow>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM dog_locations \
         WHERE ($1::uuid IS NULL OR owner_id <> $1) \
         ORDER BY updated_at, id"
    ))
    .bind(exclude_owner)
    .fetch_all(pool)
    .await
}
