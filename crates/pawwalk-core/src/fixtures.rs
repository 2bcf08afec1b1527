//! YAML seed fixtures for local development databases.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dogs::NewDogProfile;
use crate::geo::Coordinate;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeFixture {
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogFixture {
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub profile: NewDogProfile,
    /// Where the dog was last seen. Defaults to the owner's home.
    pub location: Option<Coordinate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FixturesFile {
    #[serde(default)]
    pub homes: Vec<HomeFixture>,
    #[serde(default)]
    pub dogs: Vec<DogFixture>,
}

/// Load and validate seed fixtures from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_fixtures(path: &Path) -> Result<FixturesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FixturesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let fixtures: FixturesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::FixturesFileParse)?;

    validate_fixtures(&fixtures)?;

    Ok(fixtures)
}

fn validate_fixtures(fixtures: &FixturesFile) -> Result<(), ConfigError> {
    let mut homes = HashSet::new();

    for home in &fixtures.homes {
        if Coordinate::new(home.latitude, home.longitude).is_none() {
            return Err(ConfigError::Validation(format!(
                "home for user {} has an invalid coordinate ({}, {})",
                home.user_id, home.latitude, home.longitude
            )));
        }
        if !homes.insert(home.user_id) {
            return Err(ConfigError::Validation(format!(
                "duplicate home for user {}",
                home.user_id
            )));
        }
    }

    for dog in &fixtures.dogs {
        dog.profile.validate().map_err(|e| {
            ConfigError::Validation(format!("dog '{}': {e}", dog.profile.name))
        })?;

        // Coordinate deserialization already range-checks an explicit location.
        if dog.location.is_none() && !homes.contains(&dog.owner_id) {
            return Err(ConfigError::Validation(format!(
                "dog '{}' has no location and owner {} has no home",
                dog.profile.name, dog.owner_id
            )));
        }
    }

    Ok(())
}
