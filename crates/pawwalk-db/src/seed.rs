use pawwalk_core::{Coordinate, FixturesFile};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dogs::{insert_with_location, update_in_place};
use crate::homes::{fetch_home, write_home};
use crate::DbError;

/// Counts of rows written by [`seed_fixtures`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub homes: usize,
    pub dogs_inserted: usize,
    pub dogs_updated: usize,
}

/// Upsert homes and dogs from a fixtures file.
///
/// Homes are written first so dogs without an explicit location can be placed
/// at their owner's home. A dog is matched to an existing row by owner and
/// name, which makes re-seeding idempotent. All writes run inside a single
/// transaction; if any operation fails the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::HomeLocationRequired`] if a dog has neither a location
/// nor an owner home, or [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_fixtures(pool: &PgPool, fixtures: &FixturesFile) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for home in &fixtures.homes {
        let coordinate = Coordinate::new(home.latitude, home.longitude).ok_or_else(|| {
            pawwalk_core::CoreError::Validation(format!(
                "home for {} has out-of-range coordinates",
                home.user_id
            ))
        })?;
        write_home(&mut tx, home.user_id, coordinate).await?;
        summary.homes += 1;
    }

    for dog in &fixtures.dogs {
        dog.profile.validate()?;

        let (location, is_home) = match dog.location {
            Some(location) => (location, false),
            None => {
                let home = fetch_home(&mut tx, dog.owner_id)
                    .await?
                    .and_then(|row| row.coordinate())
                    .ok_or(DbError::HomeLocationRequired)?;
                (home, true)
            }
        };

        let existing: Option<Uuid> = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM dog_profiles WHERE owner_id = $1 AND name = $2 \
             ORDER BY created_at LIMIT 1",
        )
        .bind(dog.owner_id)
        .bind(dog.profile.name.trim())
        .fetch_optional(&mut *tx)
        .await?;

        match existing {
            Some(dog_id) => {
                update_in_place(&mut tx, dog_id, &dog.profile, location, is_home).await?;
                summary.dogs_updated += 1;
            }
            None => {
                insert_with_location(&mut tx, dog.owner_id, &dog.profile, location, is_home)
                    .await?;
                summary.dogs_inserted += 1;
            }
        }
    }

    tx.commit().await?;

    tracing::info!(
        homes = summary.homes,
        dogs_inserted = summary.dogs_inserted,
        dogs_updated = summary.dogs_updated,
        "fixtures seeded"
    );
    Ok(summary)
}
