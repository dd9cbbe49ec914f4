//! User API routes
//!
//! - `GET /api/v1/users?page&per_page&sort_by&sort_order&role&is_active&search`

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use super::queries::{ListUsersError, ListUsersQuery};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::error_helpers::database_error;
use crate::features::FeatureState;

pub fn users_routes() -> Router<FeatureState> {
    Router::new().route("/", get(list_users))
}

/// `GET /api/v1/users`
///
/// - `200 OK` - Page of users with pagination metadata
/// - `400 Bad Request` - Invalid pagination or sort parameters
#[tracing::instrument(skip(state, query), fields(page = ?query.page, search = ?query.search))]
async fn list_users(
    State(state): State<FeatureState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Response, UserApiError> {
    let response = super::queries::list::handle(state.db, &state.aliases, query).await?;
    let (items, meta) = response.into_parts();
    Ok(ApiResponse::success_with_meta(items, meta).into_response())
}

#[derive(Debug)]
struct UserApiError(ListUsersError);

impl From<ListUsersError> for UserApiError {
    fn from(err: ListUsersError) -> Self {
        Self(err)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ListUsersError::Database(e) => database_error("user listing", &e),
            e => ErrorResponse::new("VALIDATION_ERROR", e.to_string())
                .into_response_with(StatusCode::BAD_REQUEST),
        }
    }
}
