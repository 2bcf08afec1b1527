//! Database operations for the `dog_locations` table.

mod read;
mod types;
mod write;

pub use read::{get_dog_location, list_candidate_locations};
pub use types::DogLocationRow;
pub use write::upsert_dog_location;

pub(crate) use write::{refresh_denormalized_fields, write_location_for_profile};
