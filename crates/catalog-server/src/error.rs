//! Server-level error type for handlers outside the feature slices

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::db::DbError;

/// Failures of the service endpoints (`/health`)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        tracing::error!("Database health check failed: {:?}", err);
        AppError::Unavailable("database is not reachable".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unavailable(message) => {
                tracing::warn!("Service unavailable: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::new("SERVICE_UNAVAILABLE", message)),
                )
                    .into_response()
            },
        }
    }
}
