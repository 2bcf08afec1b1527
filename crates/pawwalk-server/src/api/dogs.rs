//! Dog profile handlers and the per-dog location update.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use pawwalk_core::NewDogProfile;
use pawwalk_db::{DogLocationRow, DogProfileRow};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::homes::CoordinateBody;
use super::{map_db_error, not_found, parse_path_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct DogItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DogProfileRow> for DogItem {
    fn from(row: DogProfileRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            breed: row.breed,
            age: row.age,
            gender: row.gender,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DogLocationItem {
    pub dog_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_home: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<DogLocationRow> for DogLocationItem {
    fn from(row: DogLocationRow) -> Self {
        Self {
            dog_id: row.dog_id,
            latitude: row.latitude,
            longitude: row.longitude,
            is_home: row.is_home,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn create_dog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(body): Json<NewDogProfile>,
) -> Result<(StatusCode, Json<ApiResponse<DogItem>>), ApiError> {
    let rid = &req_id.0;
    let owner_id = parse_path_id(rid, &user_id)?;

    let row = pawwalk_db::insert_dog_profile(&state.pool, owner_id, &body)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(row.into(), req_id.0)),
    ))
}

pub(super) async fn list_dogs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<DogItem>>>, ApiError> {
    let rid = &req_id.0;
    let owner_id = parse_path_id(rid, &user_id)?;

    let rows = pawwalk_db::list_dogs_by_owner(&state.pool, owner_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &pawwalk_db::DbError::from(e)))?;

    Ok(Json(ApiResponse::new(
        rows.into_iter().map(DogItem::from).collect(),
        req_id.0,
    )))
}

pub(super) async fn get_dog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(dog_id): Path<String>,
) -> Result<Json<ApiResponse<DogItem>>, ApiError> {
    let rid = &req_id.0;
    let dog_id = parse_path_id(rid, &dog_id)?;

    let row = pawwalk_db::get_dog_profile(&state.pool, dog_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &pawwalk_db::DbError::from(e)))?
        .ok_or_else(|| not_found(rid, "dog"))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn update_dog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(dog_id): Path<String>,
    Json(body): Json<NewDogProfile>,
) -> Result<Json<ApiResponse<DogItem>>, ApiError> {
    let rid = &req_id.0;
    let dog_id = parse_path_id(rid, &dog_id)?;

    let row = pawwalk_db::update_dog_profile(&state.pool, dog_id, &body)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn put_dog_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(dog_id): Path<String>,
    Json(body): Json<CoordinateBody>,
) -> Result<Json<ApiResponse<DogLocationItem>>, ApiError> {
    let rid = &req_id.0;
    let dog_id = parse_path_id(rid, &dog_id)?;
    let coordinate = body.validate(rid)?;

    let row = pawwalk_db::upsert_dog_location(&state.pool, dog_id, coordinate)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn delete_dog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(dog_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rid = &req_id.0;
    let dog_id = parse_path_id(rid, &dog_id)?;

    pawwalk_db::delete_dog_profile(&state.pool, dog_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(StatusCode::NO_CONTENT)
}
