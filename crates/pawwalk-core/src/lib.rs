pub mod app_config;
pub mod config;
pub mod dogs;
pub mod fixtures;
pub mod geo;
pub mod proximity;
pub mod schedules;
pub mod walks;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dogs::{DogLocationCandidate, DogLocationRecord, NewDogProfile};
pub use fixtures::{load_fixtures, DogFixture, FixturesFile, HomeFixture};
pub use geo::{haversine_meters, Coordinate, EARTH_RADIUS_METERS};
pub use proximity::{
    rank_candidates, resolve_anchor, AnchorLookup, AnchorSource, RankOptions, RankedCandidate,
    DEFAULT_RADIUS_METERS,
};
pub use schedules::{NewDogHistory, NewWalkSchedule, ScheduleStatus};
pub use walks::{validate_walk_parties, WalkRequestStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error("cannot move walk request from {from} to {to}")]
    InvalidTransition {
        from: WalkRequestStatus,
        to: WalkRequestStatus,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read fixtures file {path}: {source}")]
    FixturesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse fixtures file: {0}")]
    FixturesFileParse(#[source] serde_yaml::Error),
    #[error("fixtures validation failed: {0}")]
    Validation(String),
}
