use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use pawwalk_core::{rank_candidates, resolve_anchor, AnchorSource, RankOptions, RankedCandidate};
use pawwalk_db::{DogLocationRow, PgAnchorLookup};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, parse_path_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    /// Breed substring, case-insensitive.
    pub q: Option<String>,
    pub radius_m: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnchorItem {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl From<AnchorSource> for AnchorItem {
    fn from(anchor: AnchorSource) -> Self {
        let coordinate = anchor.coordinate();
        Self {
            kind: anchor.kind(),
            latitude: coordinate.map(|c| c.latitude),
            longitude: coordinate.map(|c| c.longitude),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyDogItem {
    pub id: String,
    pub dog_id: Option<String>,
    pub owner_id: Option<String>,
    pub dog_name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// `None` when the distance is unknown (no anchor or no coordinate).
    pub distance_meters: Option<f64>,
}

impl From<RankedCandidate> for NearbyDogItem {
    fn from(ranked: RankedCandidate) -> Self {
        let c = ranked.candidate;
        Self {
            id: c.id,
            dog_id: c.dog_id,
            owner_id: c.owner_id,
            dog_name: c.dog_name,
            breed: c.breed,
            age: c.age,
            image_url: c.image_url,
            latitude: c.coordinate.map(|p| p.latitude),
            longitude: c.coordinate.map(|p| p.longitude),
            distance_meters: Some(ranked.distance_meters).filter(|d| d.is_finite()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyData {
    pub anchor: AnchorItem,
    pub radius_meters: f64,
    pub dogs: Vec<NearbyDogItem>,
}

pub(super) async fn list_nearby_dogs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<NearbyData>>, ApiError> {
    let rid = &req_id.0;
    let user_id = parse_path_id(rid, &user_id)?;
    let user_key = user_id.to_string();

    let options = RankOptions::with_radius(params.radius_m.unwrap_or(state.search_radius_meters))
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?
        .search(params.q);

    let anchor = resolve_anchor(&PgAnchorLookup::new(state.pool.clone()), &user_key).await;

    let rows = pawwalk_db::list_candidate_locations(&state.pool, Some(user_id))
        .await
        .map_err(|e| map_db_error(rid.clone(), &pawwalk_db::DbError::from(e)))?;

    let ranked = rank_candidates(
        &anchor,
        rows.into_iter().map(DogLocationRow::into_candidate),
        &user_key,
        &options,
    );

    tracing::debug!(
        user_id = %user_id,
        anchor = %anchor,
        matches = ranked.len(),
        "nearby search"
    );

    Ok(Json(ApiResponse::new(
        NearbyData {
            anchor: anchor.into(),
            radius_meters: options.radius_meters,
            dogs: ranked.into_iter().map(NearbyDogItem::from).collect(),
        },
        req_id.0,
    )))
}
