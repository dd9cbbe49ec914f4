//! Database and ordering error handling utilities
//!
//! Provides helpers for classifying constraint violations and for turning
//! [`OrderingError`] into the HTTP error envelope.
//!
//! # Examples
//!
//! ```rust,ignore
//! use catalog_server::features::shared::error_helpers::violated_constraint;
//!
//! match violated_constraint(&err) {
//!     Some("countries_country_world_id_key") => CreateCountryError::DuplicateCountryWorld(id),
//!     _ => CreateCountryError::Database(err),
//! }
//! ```

use axum::{http::StatusCode, response::Response};
use serde_json::json;
use sqlx::Error as SqlxError;

use crate::api::response::ErrorResponse;
use crate::ordering::OrderingError;

/// Name of the constraint a database error reports, if any
pub fn violated_constraint(error: &SqlxError) -> Option<&str> {
    match error {
        SqlxError::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// 500 envelope for a database failure; the cause is logged, not returned
pub fn database_error(context: &str, err: &SqlxError) -> Response {
    tracing::error!(error = ?err, "Database error during {}", context);
    ErrorResponse::new("INTERNAL_ERROR", "A database error occurred")
        .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}

/// HTTP status and error code for an [`OrderingError`]
pub fn ordering_status(error: &OrderingError) -> (StatusCode, &'static str) {
    match error {
        e if e.is_client_error() => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        OrderingError::Conflict(_) | OrderingError::Transaction(_) => {
            (StatusCode::CONFLICT, "CONFLICT")
        },
        OrderingError::Retryable(_) => (StatusCode::SERVICE_UNAVAILABLE, "RETRYABLE"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

/// Render an [`OrderingError`] as an error envelope
///
/// Unknown ids are listed under `details.unknown_ids`. Raw database
/// messages are logged and never returned.
pub fn ordering_error_response(error: OrderingError) -> Response {
    let (status, code) = ordering_status(&error);
    match error {
        OrderingError::UnknownIds(ref ids) => {
            let ids = ids.clone();
            ErrorResponse::with_details(code, error.to_string(), json!({ "unknown_ids": ids }))
                .into_response_with(status)
        },
        OrderingError::Database(ref e) => database_error("ordering operation", e),
        OrderingError::Retryable(_) => {
            tracing::warn!(error = %error, "Ordering transaction gave up after retry");
            ErrorResponse::new(code, error.to_string()).into_response_with(status)
        },
        other => ErrorResponse::new(code, other.to_string()).into_response_with(status),
    }
}
