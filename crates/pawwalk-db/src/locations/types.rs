//! Row types for the `dog_locations` table.

use chrono::{DateTime, Utc};
use pawwalk_core::{Coordinate, DogLocationCandidate, DogLocationRecord};
use uuid::Uuid;

/// A row from the `dog_locations` table.
///
/// `dog_name`, `breed`, `age` and `image_url` are copies of the owning
/// profile's columns, refreshed whenever the profile is edited.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DogLocationRow {
    pub id: Uuid,
    pub dog_id: Uuid,
    pub owner_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub dog_name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub image_url: Option<String>,
    pub is_home: bool,
    pub updated_at: DateTime<Utc>,
}

impl DogLocationRow {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }

    /// Convert into the storage-agnostic record the ranking layer consumes.
    #[must_use]
    pub fn into_record(self) -> DogLocationRecord {
        DogLocationRecord {
            id: self.id.to_string(),
            dog_id: Some(self.dog_id.to_string()),
            owner_id: Some(self.owner_id.to_string()),
            latitude: self.latitude,
            longitude: self.longitude,
            breed: self.breed,
            image_url: self.image_url,
            dog_name: self.dog_name,
            age: self.age,
        }
    }

    #[must_use]
    pub fn into_candidate(self) -> DogLocationCandidate {
        DogLocationCandidate::from(self.into_record())
    }
}
