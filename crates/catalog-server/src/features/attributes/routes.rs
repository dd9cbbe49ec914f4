//! Attribute API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/attributes` - Create an attribute at the end of the list
//! - `GET /api/v1/attributes` - List all attributes by `order`
//! - `POST /api/v1/attributes/reorder` - Move attributes to new positions
//! - `GET /api/v1/attributes/:id` - Get one attribute
//! - `PUT /api/v1/attributes/:id` - Rename an attribute
//! - `DELETE /api/v1/attributes/:id` - Delete an attribute

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::{
    commands::{
        CreateAttributeCommand, CreateAttributeError, DeleteAttributeCommand, DeleteAttributeError,
        ReorderAttributesCommand, ReorderAttributesError, UpdateAttributeCommand,
        UpdateAttributeError,
    },
    queries::{GetAttributeError, GetAttributeQuery, ListAttributesError, ListAttributesQuery},
};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::error_helpers::{database_error, ordering_error_response};
use crate::features::FeatureState;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn attributes_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_attribute).get(list_attributes))
        .route("/reorder", post(reorder_attributes))
        .route(
            "/:id",
            get(get_attribute).put(update_attribute).delete(delete_attribute),
        )
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `POST /api/v1/attributes`
///
/// - `201 Created` - Attribute created with the next free order
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Another create took the same order concurrently
#[tracing::instrument(skip(state, command))]
async fn create_attribute(
    State(state): State<FeatureState>,
    Json(command): Json<CreateAttributeCommand>,
) -> Result<Response, AttributeApiError> {
    let response = super::commands::create::handle(state.db, state.ordering.as_ref(), command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// `PUT /api/v1/attributes/:id`
#[tracing::instrument(skip(state, command))]
async fn update_attribute(
    State(state): State<FeatureState>,
    Path(id): Path<i32>,
    Json(mut command): Json<UpdateAttributeCommand>,
) -> Result<Response, AttributeApiError> {
    command.id = id;
    let response = super::commands::update::handle(state.db, command).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// `DELETE /api/v1/attributes/:id`
#[tracing::instrument(skip(state))]
async fn delete_attribute(
    State(state): State<FeatureState>,
    Path(id): Path<i32>,
) -> Result<Response, AttributeApiError> {
    let response = super::commands::delete::handle(state.db, DeleteAttributeCommand { id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// `POST /api/v1/attributes/reorder`
///
/// # Request Body
///
/// ```json
/// { "attributes": [{ "id": 1, "order": 4 }, { "id": 4, "order": 1 }] }
/// ```
///
/// # Response
///
/// - `200 OK` - Full attribute list in the new order
/// - `400 Bad Request` - Duplicate order, duplicate id, unknown id or non-positive order
/// - `409 Conflict` - A target order is held by an attribute outside the batch
/// - `503 Service Unavailable` - Transaction kept deadlocking; safe to retry
#[tracing::instrument(skip(state, command), fields(batch_len = command.attributes.len()))]
async fn reorder_attributes(
    State(state): State<FeatureState>,
    Json(command): Json<ReorderAttributesCommand>,
) -> Result<Response, AttributeApiError> {
    let response = super::commands::reorder::handle(state.db, state.ordering.as_ref(), command).await?;
    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// `GET /api/v1/attributes/:id`
#[tracing::instrument(skip(state))]
async fn get_attribute(
    State(state): State<FeatureState>,
    Path(id): Path<i32>,
) -> Result<Response, AttributeApiError> {
    let response = super::queries::get::handle(state.db, GetAttributeQuery { id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// `GET /api/v1/attributes`
#[tracing::instrument(skip(state))]
async fn list_attributes(State(state): State<FeatureState>) -> Result<Response, AttributeApiError> {
    let response = super::queries::list::handle(state.db, ListAttributesQuery::default()).await?;
    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AttributeApiError {
    Create(CreateAttributeError),
    Update(UpdateAttributeError),
    Delete(DeleteAttributeError),
    Reorder(ReorderAttributesError),
    Get(GetAttributeError),
    List(ListAttributesError),
}

impl From<CreateAttributeError> for AttributeApiError {
    fn from(err: CreateAttributeError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateAttributeError> for AttributeApiError {
    fn from(err: UpdateAttributeError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteAttributeError> for AttributeApiError {
    fn from(err: DeleteAttributeError) -> Self {
        Self::Delete(err)
    }
}

impl From<ReorderAttributesError> for AttributeApiError {
    fn from(err: ReorderAttributesError) -> Self {
        Self::Reorder(err)
    }
}

impl From<GetAttributeError> for AttributeApiError {
    fn from(err: GetAttributeError) -> Self {
        Self::Get(err)
    }
}

impl From<ListAttributesError> for AttributeApiError {
    fn from(err: ListAttributesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for AttributeApiError {
    fn into_response(self) -> Response {
        match self {
            AttributeApiError::Create(CreateAttributeError::NameValidation(e))
            | AttributeApiError::Update(UpdateAttributeError::NameValidation(e)) => {
                ErrorResponse::new("VALIDATION_ERROR", e.to_string())
                    .into_response_with(StatusCode::BAD_REQUEST)
            },
            AttributeApiError::Update(UpdateAttributeError::NoFieldsToUpdate) => {
                ErrorResponse::new("VALIDATION_ERROR", UpdateAttributeError::NoFieldsToUpdate.to_string())
                    .into_response_with(StatusCode::BAD_REQUEST)
            },
            AttributeApiError::Create(CreateAttributeError::Ordering(e))
            | AttributeApiError::Reorder(ReorderAttributesError::Ordering(e)) => {
                ordering_error_response(e)
            },
            AttributeApiError::Update(UpdateAttributeError::NotFound(id))
            | AttributeApiError::Delete(DeleteAttributeError::NotFound(id))
            | AttributeApiError::Get(GetAttributeError::NotFound(id)) => ErrorResponse::new(
                "NOT_FOUND",
                format!("Attribute with id {} not found", id),
            )
            .into_response_with(StatusCode::NOT_FOUND),
            AttributeApiError::Update(UpdateAttributeError::Database(e)) => {
                database_error("attribute update", &e)
            },
            AttributeApiError::Delete(DeleteAttributeError::Database(e)) => {
                database_error("attribute deletion", &e)
            },
            AttributeApiError::Reorder(ReorderAttributesError::Database(e)) => {
                database_error("attribute reorder", &e)
            },
            AttributeApiError::Get(GetAttributeError::Database(e)) => {
                database_error("attribute retrieval", &e)
            },
            AttributeApiError::List(ListAttributesError::Database(e)) => {
                database_error("attribute listing", &e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::validation::NameValidationError;
    use crate::ordering::OrderingError;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (
                AttributeApiError::Create(CreateAttributeError::NameValidation(
                    NameValidationError::Required,
                )),
                StatusCode::BAD_REQUEST,
            ),
            (
                AttributeApiError::Create(CreateAttributeError::Ordering(OrderingError::Conflict(
                    "taken".into(),
                ))),
                StatusCode::CONFLICT,
            ),
            (
                AttributeApiError::Reorder(ReorderAttributesError::Ordering(
                    OrderingError::UnknownIds(vec![99]),
                )),
                StatusCode::BAD_REQUEST,
            ),
            (
                AttributeApiError::Reorder(ReorderAttributesError::Ordering(
                    OrderingError::Retryable("deadlock".into()),
                )),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AttributeApiError::Get(GetAttributeError::NotFound(3)), StatusCode::NOT_FOUND),
            (
                AttributeApiError::List(ListAttributesError::Database(sqlx::Error::PoolTimedOut)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
