//! REST API endpoints.
//!
//! Axum-based HTTP API for building study schedules from playlists,
//! retrieving stored schedules, and marking videos completed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::fetch::FetchError;
use crate::models::DurationError;
use crate::scheduler::ScheduleError;
use crate::storage::StorageError;

pub mod routes;
pub mod state;

use state::AppState;

/// API error types. Bad input, missing resources, upstream playlist
/// failures, and internal faults map to distinct status codes so clients
/// can tell them apart.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ScheduleError> for ApiError {
    fn from(e: ScheduleError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<DurationError> for ApiError {
    fn from(e: DurationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) | StorageError::LinkNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e {
            // Caller gave us something unusable
            FetchError::InvalidUrl(_) | FetchError::EmptyPlaylist | FetchError::MissingApiKey(_) => {
                ApiError::BadRequest(e.to_string())
            }
            // The playlist service itself failed
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

/// Build the API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/schedule", post(routes::schedule::create_schedule))
        .route(
            "/api/schedule/preview",
            post(routes::schedule::preview_schedule),
        )
        .route("/api/schedule/:id", get(routes::schedule::get_schedule))
        .route(
            "/api/schedule/:id/complete",
            post(routes::schedule::complete_video),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_error_maps_to_bad_request() {
        let err: ApiError = ScheduleError::InvalidDayCount.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_duration_error_maps_to_bad_request() {
        let err: ApiError = DurationError::InvalidFormat("abc".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let err: ApiError = StorageError::NotFound("x".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = StorageError::LinkNotFound("y".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_empty_playlist_maps_to_bad_request() {
        let err: ApiError = FetchError::EmptyPlaylist.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_upstream_http_failure_maps_to_upstream() {
        let err: ApiError = FetchError::HttpStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
