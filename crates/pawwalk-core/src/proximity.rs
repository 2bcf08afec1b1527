//! Anchor resolution and proximity ranking.
//!
//! [`resolve_anchor`] picks the point a user's "nearby" view is measured from:
//! the latest location of their most recently registered dog, else their home,
//! else nothing. [`rank_candidates`] then filters and orders dog locations by
//! great-circle distance from that point. Ranking is pure; anchor resolution
//! only touches storage through the [`AnchorLookup`] handed to it.

use std::fmt;
use std::future::Future;

use serde::Serialize;

use crate::dogs::DogLocationCandidate;
use crate::geo::{haversine_meters, Coordinate};
use crate::CoreError;

/// Radius used when the caller does not supply one.
pub const DEFAULT_RADIUS_METERS: f64 = 5_000.0;

/// Where a user's proximity anchor came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorSource {
    /// Latest location of the user's most recently registered dog.
    Dog(Coordinate),
    /// The user's declared home.
    Home(Coordinate),
    /// Neither lookup produced a coordinate.
    Absent,
}

impl AnchorSource {
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            AnchorSource::Dog(c) | AnchorSource::Home(c) => Some(*c),
            AnchorSource::Absent => None,
        }
    }

    /// Stable label for API payloads and CLI output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AnchorSource::Dog(_) => "dog",
            AnchorSource::Home(_) => "home",
            AnchorSource::Absent => "none",
        }
    }
}

impl fmt::Display for AnchorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coordinate() {
            Some(c) => write!(
                f,
                "{} ({:.6}, {:.6})",
                self.kind(),
                c.latitude,
                c.longitude
            ),
            None => f.write_str(self.kind()),
        }
    }
}

/// Storage lookups needed to resolve an anchor.
///
/// Implemented by the Postgres layer and by in-memory fakes in tests. Errors
/// are never surfaced by [`resolve_anchor`]; they only need to be printable.
pub trait AnchorLookup: Sync {
    type Error: fmt::Display + Send;

    /// Id of the most recently created dog owned by `user_id`.
    fn most_recent_dog(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Latest known location of `dog_id`.
    fn dog_location(
        &self,
        dog_id: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, Self::Error>> + Send;

    /// Declared home of `user_id`.
    fn home_location(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, Self::Error>> + Send;
}

/// Resolve the proximity anchor for `user_id`.
///
/// Preference order is dog location, then home, then [`AnchorSource::Absent`].
/// A failed lookup counts as "not found" and resolution moves on to the next
/// tier. A blank `user_id` short-circuits to `Absent` without any lookup.
pub async fn resolve_anchor<L: AnchorLookup>(lookup: &L, user_id: &str) -> AnchorSource {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        tracing::debug!("anchor resolution skipped for blank user id");
        return AnchorSource::Absent;
    }

    if let Some(coordinate) = dog_anchor(lookup, user_id).await {
        return AnchorSource::Dog(coordinate);
    }

    let home = fail_soft(lookup.home_location(user_id).await, user_id, "home_location");
    home.map_or(AnchorSource::Absent, AnchorSource::Home)
}

async fn dog_anchor<L: AnchorLookup>(lookup: &L, user_id: &str) -> Option<Coordinate> {
    let dog_id = fail_soft(
        lookup.most_recent_dog(user_id).await,
        user_id,
        "most_recent_dog",
    )?;
    fail_soft(lookup.dog_location(&dog_id).await, user_id, "dog_location")
}

fn fail_soft<T, E: fmt::Display>(
    result: Result<Option<T>, E>,
    user_id: &str,
    tier: &'static str,
) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(user_id, tier, error = %e, "anchor lookup failed; treating as not found");
        None
    })
}

/// Filtering knobs for [`rank_candidates`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// Case-insensitive breed substring; empty means no filter.
    pub search_text: Option<String>,
    /// Exclusive upper bound on distance when an anchor exists.
    pub radius_meters: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            search_text: None,
            radius_meters: DEFAULT_RADIUS_METERS,
        }
    }
}

impl RankOptions {
    /// Options with the given radius and no search filter.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `radius_meters` is not a positive,
    /// finite number.
    pub fn with_radius(radius_meters: f64) -> Result<Self, CoreError> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(CoreError::Validation(format!(
                "radius must be a positive number of meters, got {radius_meters}"
            )));
        }
        Ok(Self {
            search_text: None,
            radius_meters,
        })
    }

    #[must_use]
    pub fn search(mut self, text: Option<impl Into<String>>) -> Self {
        self.search_text = text.map(Into::into);
        self
    }

    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// A candidate with its distance from the anchor.
///
/// `distance_meters` is `f64::INFINITY` when there was no anchor or the
/// candidate has no coordinate; it serializes to `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: DogLocationCandidate,
    pub distance_meters: f64,
}

/// Filter and order `candidates` by distance from `anchor`.
///
/// Filters, in order: drop anything owned by `exclude_owner_id`, apply the
/// breed search, then (only with a real anchor) drop anything at or beyond
/// the radius. The sort is stable, so equal distances keep input order.
#[must_use]
pub fn rank_candidates<I>(
    anchor: &AnchorSource,
    candidates: I,
    exclude_owner_id: &str,
    options: &RankOptions,
) -> Vec<RankedCandidate>
where
    I: IntoIterator<Item = DogLocationCandidate>,
{
    let origin = anchor.coordinate();
    let needle = options.needle();

    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .filter(|c| c.owner_id.as_deref() != Some(exclude_owner_id))
        .filter(|c| {
            needle
                .as_deref()
                .is_none_or(|n| breed_matches(c.breed.as_deref(), n))
        })
        .map(|candidate| RankedCandidate {
            distance_meters: distance_between(origin, candidate.coordinate),
            candidate,
        })
        .filter(|r| origin.is_none() || r.distance_meters < options.radius_meters)
        .collect();

    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    ranked
}

fn distance_between(origin: Option<Coordinate>, target: Option<Coordinate>) -> f64 {
    match (origin, target) {
        (Some(from), Some(to)) => haversine_meters(from, to),
        _ => f64::INFINITY,
    }
}

fn breed_matches(breed: Option<&str>, needle_lower: &str) -> bool {
    breed.is_some_and(|b| b.to_lowercase().contains(needle_lower))
}

#[cfg(test)]
#[path = "proximity_test.rs"]
mod tests;
