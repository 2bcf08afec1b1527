mod dogs;
mod histories;
mod homes;
mod nearby;
mod schedules;
mod walks;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use pawwalk_core::CoreError;
use pawwalk_db::DbError;
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Radius applied to nearby searches that do not pass `radius_m`.
    pub search_radius_meters: f64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Parse a user or dog id taken from the path.
pub(super) fn parse_path_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    pawwalk_db::parse_id(raw)
        .map_err(|_| ApiError::new(request_id, "bad_request", format!("invalid id '{raw}'")))
}

pub(super) fn not_found(request_id: &str, what: &str) -> ApiError {
    ApiError::new(request_id, "not_found", format!("{what} not found"))
}

pub(super) fn map_db_error(request_id: String, error: &DbError) -> ApiError {
    match error {
        DbError::NotFound => ApiError::new(request_id, "not_found", "record not found"),
        DbError::InvalidId(_) => ApiError::new(request_id, "bad_request", error.to_string()),
        DbError::HomeLocationRequired => {
            ApiError::new(request_id, "conflict", error.to_string())
        }
        DbError::Core(CoreError::Validation(_)) => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        DbError::Core(CoreError::InvalidTransition { .. }) => {
            ApiError::new(request_id, "conflict", error.to_string())
        }
        DbError::Sqlx(_) if error.is_unique_violation() => {
            tracing::warn!(error = %error, "write lost a uniqueness race");
            ApiError::new(request_id, "conflict", "conflicting write; retry the request")
        }
        DbError::Core(CoreError::InvalidStatus(_))
        | DbError::Sqlx(_)
        | DbError::Migration(_) => {
            tracing::error!(error = %error, "database query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/{user_id}/nearby", get(nearby::list_nearby_dogs))
        .route(
            "/api/v1/users/{user_id}/home",
            get(homes::get_home).put(homes::put_home),
        )
        .route(
            "/api/v1/users/{user_id}/dogs",
            get(dogs::list_dogs).post(dogs::create_dog),
        )
        .route(
            "/api/v1/users/{user_id}/walk-requests",
            get(walks::list_pending_requests),
        )
        .route(
            "/api/v1/users/{user_id}/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route(
            "/api/v1/dogs/{dog_id}",
            get(dogs::get_dog)
                .patch(dogs::update_dog)
                .delete(dogs::delete_dog),
        )
        .route("/api/v1/dogs/{dog_id}/location", put(dogs::put_dog_location))
        .route(
            "/api/v1/dogs/{dog_id}/histories",
            get(histories::list_histories).post(histories::create_history),
        )
        .route(
            "/api/v1/schedules/{schedule_id}",
            get(schedules::get_schedule)
                .patch(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route(
            "/api/v1/histories/{history_id}",
            get(histories::get_history)
                .patch(histories::update_history)
                .delete(histories::delete_history),
        )
        .route("/api/v1/walk-requests", post(walks::create_request))
        .route(
            "/api/v1/walk-requests/{request_id}/respond",
            post(walks::respond_to_request),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match pawwalk_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
