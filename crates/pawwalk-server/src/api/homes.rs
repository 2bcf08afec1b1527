use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use pawwalk_core::Coordinate;
use pawwalk_db::HomeLocationRow;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, not_found, parse_path_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CoordinateBody {
    pub latitude: f64,
    pub longitude: f64,
}

impl CoordinateBody {
    pub(super) fn validate(&self, request_id: &str) -> Result<Coordinate, ApiError> {
        Coordinate::new(self.latitude, self.longitude).ok_or_else(|| {
            ApiError::new(
                request_id,
                "validation_error",
                "latitude must be within ±90 and longitude within ±180",
            )
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct HomeItem {
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

impl From<HomeLocationRow> for HomeItem {
    fn from(row: HomeLocationRow) -> Self {
        Self {
            user_id: row.user_id,
            latitude: row.latitude,
            longitude: row.longitude,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn get_home(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<HomeItem>>, ApiError> {
    let rid = &req_id.0;
    let user_id = parse_path_id(rid, &user_id)?;

    let row = pawwalk_db::get_home_location(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &pawwalk_db::DbError::from(e)))?
        .ok_or_else(|| not_found(rid, "home location"))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn put_home(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(body): Json<CoordinateBody>,
) -> Result<Json<ApiResponse<HomeItem>>, ApiError> {
    let rid = &req_id.0;
    let user_id = parse_path_id(rid, &user_id)?;
    let coordinate = body.validate(rid)?;

    let row = pawwalk_db::upsert_home_location(&state.pool, user_id, coordinate)
        .await
        .map_err(|e| map_db_error(rid.clone(), &pawwalk_db::DbError::from(e)))?;

    tracing::info!(user_id = %user_id, "home location updated");
    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}
