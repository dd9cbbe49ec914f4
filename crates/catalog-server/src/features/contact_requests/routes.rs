//! Contact request API routes
//!
//! - `POST /api/v1/contact-requests` - Submit the public contact form
//! - `GET /api/v1/contact-requests` - List with search, filters, sort and paging
//! - `GET /api/v1/contact-requests/:id` - Get one request
//! - `DELETE /api/v1/contact-requests/:id` - Delete a request

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::{
    commands::{
        CreateContactRequestCommand, CreateContactRequestError, DeleteContactRequestCommand,
        DeleteContactRequestError,
    },
    queries::{
        GetContactRequestError, GetContactRequestQuery, ListContactRequestsError,
        ListContactRequestsQuery,
    },
};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::error_helpers::database_error;
use crate::features::FeatureState;

pub fn contact_requests_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_contact_request).get(list_contact_requests))
        .route("/:id", get(get_contact_request).delete(delete_contact_request))
}

/// `POST /api/v1/contact-requests`
#[tracing::instrument(skip(state, command))]
async fn create_contact_request(
    State(state): State<FeatureState>,
    Json(command): Json<CreateContactRequestCommand>,
) -> Result<Response, ContactRequestApiError> {
    let response = super::commands::create::handle(state.db, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// `DELETE /api/v1/contact-requests/:id`
#[tracing::instrument(skip(state))]
async fn delete_contact_request(
    State(state): State<FeatureState>,
    Path(id): Path<i32>,
) -> Result<Response, ContactRequestApiError> {
    let response =
        super::commands::delete::handle(state.db, DeleteContactRequestCommand { id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// `GET /api/v1/contact-requests/:id`
#[tracing::instrument(skip(state))]
async fn get_contact_request(
    State(state): State<FeatureState>,
    Path(id): Path<i32>,
) -> Result<Response, ContactRequestApiError> {
    let response = super::queries::get::handle(state.db, GetContactRequestQuery { id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// `GET /api/v1/contact-requests?sort=createdAt:desc,name:asc&search=&destination_country=&nationality=&start_date=&end_date=`
///
/// - `200 OK` - Page of requests with pagination metadata
/// - `400 Bad Request` - Unknown sort key, bad date or bad pagination
#[tracing::instrument(skip(state, query), fields(page = ?query.page, sort = ?query.sort))]
async fn list_contact_requests(
    State(state): State<FeatureState>,
    Query(query): Query<ListContactRequestsQuery>,
) -> Result<Response, ContactRequestApiError> {
    let response = super::queries::list::handle(state.db, &state.aliases, query).await?;
    let (items, meta) = response.into_parts();
    Ok(ApiResponse::success_with_meta(items, meta).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum ContactRequestApiError {
    Create(CreateContactRequestError),
    Delete(DeleteContactRequestError),
    Get(GetContactRequestError),
    List(ListContactRequestsError),
}

impl From<CreateContactRequestError> for ContactRequestApiError {
    fn from(err: CreateContactRequestError) -> Self {
        Self::Create(err)
    }
}

impl From<DeleteContactRequestError> for ContactRequestApiError {
    fn from(err: DeleteContactRequestError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetContactRequestError> for ContactRequestApiError {
    fn from(err: GetContactRequestError) -> Self {
        Self::Get(err)
    }
}

impl From<ListContactRequestsError> for ContactRequestApiError {
    fn from(err: ListContactRequestsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for ContactRequestApiError {
    fn into_response(self) -> Response {
        match self {
            ContactRequestApiError::Create(CreateContactRequestError::Database(e)) => {
                database_error("contact request creation", &e)
            },
            ContactRequestApiError::Delete(DeleteContactRequestError::Database(e)) => {
                database_error("contact request deletion", &e)
            },
            ContactRequestApiError::Get(GetContactRequestError::Database(e)) => {
                database_error("contact request retrieval", &e)
            },
            ContactRequestApiError::List(ListContactRequestsError::Database(e)) => {
                database_error("contact request listing", &e)
            },
            ContactRequestApiError::Delete(e @ DeleteContactRequestError::NotFound(_)) => {
                ErrorResponse::new("NOT_FOUND", e.to_string())
                    .into_response_with(StatusCode::NOT_FOUND)
            },
            ContactRequestApiError::Get(e @ GetContactRequestError::NotFound(_)) => {
                ErrorResponse::new("NOT_FOUND", e.to_string())
                    .into_response_with(StatusCode::NOT_FOUND)
            },
            ContactRequestApiError::Create(e) => {
                ErrorResponse::new("VALIDATION_ERROR", e.to_string())
                    .into_response_with(StatusCode::BAD_REQUEST)
            },
            ContactRequestApiError::List(e) => {
                ErrorResponse::new("VALIDATION_ERROR", e.to_string())
                    .into_response_with(StatusCode::BAD_REQUEST)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::sorting::SortError;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (
                ContactRequestApiError::List(ListContactRequestsError::Sort(
                    SortError::InvalidDirection("up".into()),
                )),
                StatusCode::BAD_REQUEST,
            ),
            (
                ContactRequestApiError::List(ListContactRequestsError::InvalidDateRange),
                StatusCode::BAD_REQUEST,
            ),
            (
                ContactRequestApiError::Get(GetContactRequestError::NotFound(1)),
                StatusCode::NOT_FOUND,
            ),
            (
                ContactRequestApiError::Delete(DeleteContactRequestError::Database(
                    sqlx::Error::PoolTimedOut,
                )),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
