pub mod anchor;
pub mod dogs;
pub mod histories;
pub mod homes;
pub mod locations;
pub mod pool;
pub mod schedules;
pub mod seed;
pub mod walk_requests;

use thiserror::Error;
use uuid::Uuid;

pub use anchor::PgAnchorLookup;
pub use dogs::{
    delete_dog_profile, get_dog_profile, get_most_recent_dog_for_owner, insert_dog_profile,
    list_dogs_by_owner, update_dog_profile, DogProfileRow,
};
pub use histories::{
    delete_dog_history, get_dog_history, insert_dog_history, list_histories_for_dog,
    update_dog_history, DogHistoryRow,
};
pub use homes::{get_home_location, upsert_home_location, HomeLocationRow};
pub use locations::{get_dog_location, list_candidate_locations, upsert_dog_location, DogLocationRow};
pub use pool::{connect_pool, health_check, ping, run_migrations, PoolConfig};
pub use schedules::{
    delete_walk_schedule, get_walk_schedule, insert_walk_schedule, list_schedules_for_user,
    update_walk_schedule, WalkScheduleRow,
};
pub use seed::{seed_fixtures, SeedSummary};
pub use walk_requests::{
    create_walk_request, get_walk_request, list_pending_requests_for_user,
    respond_to_walk_request, NewWalkRequest, PendingWalkRequestRow, WalkRequestRow,
};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error("owner has no home location; set one before registering a dog")]
    HomeLocationRequired,
    #[error("invalid id {0:?}")]
    InvalidId(String),
    #[error(transparent)]
    Core(#[from] pawwalk_core::CoreError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    /// True when Postgres rejected a write on a unique constraint.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::Sqlx(sqlx::Error::Database(e)) if e.is_unique_violation())
    }
}

/// Parse a textual user or dog id.
///
/// # Errors
///
/// Returns [`DbError::InvalidId`] if `raw` is not a UUID.
pub fn parse_id(raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DbError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_defaults_match_documented_env_defaults() {
        assert_eq!(
            PoolConfig::default(),
            PoolConfig {
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 10,
            }
        );
    }

    #[test]
    fn only_database_errors_count_as_unique_violations() {
        assert!(!DbError::NotFound.is_unique_violation());
        assert!(!DbError::Sqlx(sqlx::Error::RowNotFound).is_unique_violation());
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(matches!(parse_id("not-a-uuid"), Err(DbError::InvalidId(_))));
        assert!(parse_id(" 6f1c1f7e-3b0a-4d5e-9a55-1f2b3c4d5e6f ").is_ok());
    }
}
