//! Dog profile input validation and the candidate shape consumed by ranking.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::CoreError;

const MAX_DOG_AGE: i32 = 40;

/// A dog-location row as it comes out of storage: every column nullable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DogLocationRecord {
    pub id: String,
    pub dog_id: Option<String>,
    pub owner_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub breed: Option<String>,
    pub image_url: Option<String>,
    pub dog_name: Option<String>,
    pub age: Option<String>,
}

/// One dog's most recent known position plus denormalized display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DogLocationCandidate {
    pub id: String,
    pub dog_id: Option<String>,
    pub owner_id: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub breed: Option<String>,
    pub image_url: Option<String>,
    pub dog_name: Option<String>,
    pub age: Option<String>,
}

impl From<DogLocationRecord> for DogLocationCandidate {
    fn from(record: DogLocationRecord) -> Self {
        Self {
            coordinate: Coordinate::from_parts(record.latitude, record.longitude),
            id: record.id,
            dog_id: non_blank(record.dog_id),
            owner_id: non_blank(record.owner_id),
            breed: non_blank(record.breed),
            image_url: non_blank(record.image_url),
            dog_name: non_blank(record.dog_name),
            age: non_blank(record.age),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Input for registering or editing a dog profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDogProfile {
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: String,
    pub image_url: Option<String>,
}

impl NewDogProfile {
    /// Check required fields before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("name", &self.name),
            ("breed", &self.breed),
            ("gender", &self.gender),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} must be non-empty")));
            }
        }

        if !(0..=MAX_DOG_AGE).contains(&self.age) {
            return Err(CoreError::Validation(format!(
                "age {} out of range 0..={MAX_DOG_AGE}",
                self.age
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> NewDogProfile {
        NewDogProfile {
            name: "Bori".to_string(),
            breed: "Poodle Mix".to_string(),
            age: 3,
            gender: "female".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn record_without_longitude_has_no_coordinate() {
        let candidate = DogLocationCandidate::from(DogLocationRecord {
            id: "loc-1".to_string(),
            latitude: Some(37.5),
            longitude: None,
            ..DogLocationRecord::default()
        });
        assert!(candidate.coordinate.is_none());
        assert_eq!(candidate.id, "loc-1");
    }

    #[test]
    fn record_blank_strings_become_none() {
        let candidate = DogLocationCandidate::from(DogLocationRecord {
            id: "loc-2".to_string(),
            breed: Some("   ".to_string()),
            dog_name: Some("Choco".to_string()),
            ..DogLocationRecord::default()
        });
        assert!(candidate.breed.is_none());
        assert_eq!(candidate.dog_name.as_deref(), Some("Choco"));
    }

    #[test]
    fn record_deserializes_from_loose_json() {
        let record: DogLocationRecord = serde_json::from_value(serde_json::json!({
            "id": "loc-3",
            "latitude": 37.5,
            "longitude": 127.0,
            "breed": null
        }))
        .expect("deserialize");
        let candidate = DogLocationCandidate::from(record);
        assert_eq!(candidate.coordinate, Coordinate::new(37.5, 127.0));
        assert!(candidate.breed.is_none());
    }

    #[test]
    fn validate_accepts_complete_profile() {
        assert!(valid_profile().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_breed() {
        let mut profile = valid_profile();
        profile.breed = " ".to_string();
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("breed"));
    }

    #[test]
    fn validate_rejects_negative_age() {
        let mut profile = valid_profile();
        profile.age = -1;
        assert!(matches!(profile.validate(), Err(CoreError::Validation(_))));
    }
}
