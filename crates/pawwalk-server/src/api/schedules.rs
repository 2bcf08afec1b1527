//! Walk schedule handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use pawwalk_core::NewWalkSchedule;
use pawwalk_db::{DbError, WalkScheduleRow};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, not_found, parse_path_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ScheduleItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dog_id: Option<Uuid>,
    pub target_dog_id: Option<Uuid>,
    pub memo: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WalkScheduleRow> for ScheduleItem {
    fn from(row: WalkScheduleRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            dog_id: row.dog_id,
            target_dog_id: row.target_dog_id,
            memo: row.memo,
            scheduled_at: row.scheduled_at,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn create_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(body): Json<NewWalkSchedule>,
) -> Result<(StatusCode, Json<ApiResponse<ScheduleItem>>), ApiError> {
    let rid = &req_id.0;
    let user_id = parse_path_id(rid, &user_id)?;

    let row = pawwalk_db::insert_walk_schedule(&state.pool, user_id, &body)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(row.into(), req_id.0)),
    ))
}

pub(super) async fn list_schedules(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ScheduleItem>>>, ApiError> {
    let rid = &req_id.0;
    let user_id = parse_path_id(rid, &user_id)?;

    let rows = pawwalk_db::list_schedules_for_user(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &DbError::from(e)))?;

    Ok(Json(ApiResponse::new(
        rows.into_iter().map(ScheduleItem::from).collect(),
        req_id.0,
    )))
}

pub(super) async fn get_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(schedule_id): Path<String>,
) -> Result<Json<ApiResponse<ScheduleItem>>, ApiError> {
    let rid = &req_id.0;
    let schedule_id = parse_path_id(rid, &schedule_id)?;

    let row = pawwalk_db::get_walk_schedule(&state.pool, schedule_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &DbError::from(e)))?
        .ok_or_else(|| not_found(rid, "schedule"))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn update_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(schedule_id): Path<String>,
    Json(body): Json<NewWalkSchedule>,
) -> Result<Json<ApiResponse<ScheduleItem>>, ApiError> {
    let rid = &req_id.0;
    let schedule_id = parse_path_id(rid, &schedule_id)?;

    let row = pawwalk_db::update_walk_schedule(&state.pool, schedule_id, &body)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}

pub(super) async fn delete_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(schedule_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rid = &req_id.0;
    let schedule_id = parse_path_id(rid, &schedule_id)?;

    pawwalk_db::delete_walk_schedule(&state.pool, schedule_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(StatusCode::NO_CONTENT)
}
