use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use pawwalk_core::WalkRequestStatus;
use pawwalk_db::{NewWalkRequest, PendingWalkRequestRow, WalkRequestRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, parse_path_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CreateWalkRequestBody {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    /// The requester's dog; defaults to their most recently registered one.
    pub dog_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RespondBody {
    pub status: WalkRequestStatus,
}

#[derive(Debug, Serialize)]
pub(super) struct WalkRequestItem {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub dog_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<WalkRequestRow> for WalkRequestItem {
    fn from(row: WalkRequestRow) -> Self {
        Self {
            id: row.id,
            from_user_id: row.from_user_id,
            to_user_id: row.to_user_id,
            dog_id: row.dog_id,
            status: row.status,
            created_at: row.created_at,
            responded_at: row.responded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PendingRequestItem {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub dog_id: Uuid,
    pub dog_name: String,
    pub dog_breed: Option<String>,
    pub dog_age: Option<i32>,
    pub dog_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PendingWalkRequestRow> for PendingRequestItem {
    fn from(row: PendingWalkRequestRow) -> Self {
        Self {
            id: row.id,
            from_user_id: row.from_user_id,
            dog_id: row.dog_id,
            dog_name: row.dog_name,
            dog_breed: row.dog_breed,
            dog_age: row.dog_age,
            dog_image_url: row.dog_image_url,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn create_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateWalkRequestBody>,
) -> Result<(StatusCode, Json<ApiResponse<WalkRequestItem>>), ApiError> {
    let rid = &req_id.0;
    let request = NewWalkRequest {
        from_user_id: body.from_user_id,
        to_user_id: body.to_user_id,
        dog_id: body.dog_id,
    };

    let row = pawwalk_db::create_walk_request(&state.pool, &request)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(row.into(), req_id.0)),
    ))
}

pub(super) async fn list_pending_requests(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<PendingRequestItem>>>, ApiError> {
    let rid = &req_id.0;
    let user_id = parse_path_id(rid, &user_id)?;

    let rows = pawwalk_db::list_pending_requests_for_user(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &pawwalk_db::DbError::from(e)))?;

    Ok(Json(ApiResponse::new(
        rows.into_iter().map(PendingRequestItem::from).collect(),
        req_id.0,
    )))
}

pub(super) async fn respond_to_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(request_id): Path<String>,
    Json(body): Json<RespondBody>,
) -> Result<Json<ApiResponse<WalkRequestItem>>, ApiError> {
    let rid = &req_id.0;
    let request_id = parse_path_id(rid, &request_id)?;

    let row = pawwalk_db::respond_to_walk_request(&state.pool, request_id, body.status)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(row.into(), req_id.0)))
}
