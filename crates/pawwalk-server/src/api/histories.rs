//! Walk diary handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use pawwalk_core::NewDogHistory;
use pawwalk_db::{DbError, DogHistoryRow};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, not_found, parse_path_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct HistoryItem {
    pub id: Uuid,
    pub dog_id: Uuid,
    pub entry_date: NaiveDate,
    pub memo: Option<String>,
    pub hashtags: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DogHistoryRow> for HistoryItem {
    fn from(row: DogHistoryRow) -> Self {
        Self {
            id: row.id,
            dog_id: row.dog_id,
            entry_date: row.entry_date,
            memo: row.memo,
            hashtags: row.hashtags,
            image_urls: row.image_urls,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn create_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(dog_id): Path<String>,
    Json(body): Json<NewDogHistory>,
) -> Result<(StatusCode, Json<ApiResponse<HistoryItem>>), ApiError> {
    let rid = &req_id.0;
    let dog_id = parse_path_id(rid, &dog_id)?;

    let row = pawwalk_db::insert_dog_history(&state.pool, dog_id, &body)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(row.into(), req_id.0)),
    ))
}

pub(super) async fn list_histories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(dog_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<HistoryItem>>>, ApiError> {
    let rid = &req_id.0;
    let dog_id = parse_path_id(rid, &dog_id)?;

    let rows = pawwalk_db::list_histories_for_dog(&state.pool, dog_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &DbError::from(e)))?;

    Ok(Json(ApiResponse::new(
        rows.into_iter().map(HistoryItem::from).collect(),
        req_id.0,
    )))
}

pub(super) async fn get_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(history_id): Path<String>,
) -> Result<Json<ApiResponse<HistoryItem>>, ApiError> {
    let rid = &req_id.0;
    let history_id = parse_path_id(rid, &history_id)?;

    let row = pawwalk_db::get_dog_history(&state.pool, history_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &DbError::from(e)))?
        .ok_or_else(|| not_found(rid, "diary entry"))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn update_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(history_id): Path<String>,
    Json(body): Json<NewDogHistory>,
) -> Result<Json<ApiResponse<HistoryItem>>, ApiError> {
    let rid = &req_id.0;
    let history_id = parse_path_id(rid, &history_id)?;

    let row = pawwalk_db::update_dog_history(&state.pool, history_id, &body)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn delete_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(history_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rid = &req_id.0;
    let history_id = parse_path_id(rid, &history_id)?;

    pawwalk_db::delete_dog_history(&state.pool, history_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(StatusCode::NO_CONTENT)
}
