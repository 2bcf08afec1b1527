//! Postgres-backed [`AnchorLookup`].

use pawwalk_core::{AnchorLookup, Coordinate};
use sqlx::PgPool;

use crate::{dogs, homes, locations, parse_id, DbError};

/// Resolves anchors against the live tables.
#[derive(Debug, Clone)]
pub struct PgAnchorLookup {
    pool: PgPool,
}

impl PgAnchorLookup {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AnchorLookup for PgAnchorLookup {
    type Error = DbError;

    async fn most_recent_dog(&self, user_id: &str) -> Result<Option<String>, DbError> {
        let owner_id = parse_id(user_id)?;
        let row = dogs::get_most_recent_dog_for_owner(&self.pool, owner_id).await?;
        Ok(row.map(|dog| dog.id.to_string()))
    }

    async fn dog_location(&self, dog_id: &str) -> Result<Option<Coordinate>, DbError> {
        let dog_id = parse_id(dog_id)?;
        let row = locations::get_dog_location(&self.pool, dog_id).await?;
        Ok(row.and_then(|location| location.coordinate()))
    }

    async fn home_location(&self, user_id: &str) -> Result<Option<Coordinate>, DbError> {
        let user_id = parse_id(user_id)?;
        let row = homes::get_home_location(&self.pool, user_id).await?;
        Ok(row.and_then(|home| home.coordinate()))
    }
}
