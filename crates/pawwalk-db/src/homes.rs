//! Database operations for the `user_home_locations` table.

use chrono::{DateTime, Utc};
use pawwalk_core::Coordinate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// A user's declared home.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HomeLocationRow {
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HomeLocationRow {
    /// `None` only if the stored pair is somehow out of range.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Fetch the home of `user_id`, if one was ever set.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_home_location(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<HomeLocationRow>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    fetch_home(&mut conn, user_id).await
}

/// Set or replace the home of `user_id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_home_location(
    pool: &PgPool,
    user_id: Uuid,
    coordinate: Coordinate,
) -> Result<HomeLocationRow, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    write_home(&mut conn, user_id, coordinate).await
}

pub(crate) async fn fetch_home(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Option<HomeLocationRow>, sqlx::Error> {
    sqlx::query_as::<_, HomeLocationRow>(
        "SELECT user_id, latitude, longitude, created_at, updated_at \
         FROM user_home_locations WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

pub(crate) async fn write_home(
    conn: &mut PgConnection,
    user_id: Uuid,
    coordinate: Coordinate,
) -> Result<HomeLocationRow, sqlx::Error> {
    sqlx::query_as::<_, HomeLocationRow>(
        "INSERT INTO user_home_locations (user_id, latitude, longitude) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (user_id) DO UPDATE SET \
             latitude   = EXCLUDED.latitude, \
             longitude  = EXCLUDED.longitude, \
             updated_at = NOW() \
         RETURNING user_id, latitude, longitude, created_at, updated_at",
    )
    .bind(user_id)
    .bind(coordinate.latitude)
    .bind(coordinate.longitude)
    .fetch_one(conn)
    .await
}
