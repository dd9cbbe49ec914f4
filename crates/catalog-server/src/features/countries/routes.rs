//! Country API routes
//!
//! - `POST /api/v1/countries` - Add a country (with attribute values)
//! - `GET /api/v1/countries?search=&page=&per_page=` - List by `order`
//! - `POST /api/v1/countries/reorder` - Move countries to new positions
//! - `GET /api/v1/countries/:id` - Get a country with its attribute values
//! - `DELETE /api/v1/countries/:id` - Delete a country

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::{
    commands::{
        CreateCountryCommand, CreateCountryError, DeleteCountryCommand, DeleteCountryError,
        ReorderCountriesCommand, ReorderCountriesError,
    },
    queries::{GetCountryError, GetCountryQuery, ListCountriesError, ListCountriesQuery},
};
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::error_helpers::{database_error, ordering_error_response};
use crate::features::FeatureState;

pub fn countries_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_country).get(list_countries))
        .route("/reorder", post(reorder_countries))
        .route("/:id", get(get_country).delete(delete_country))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `POST /api/v1/countries`
///
/// - `201 Created` - Country created at the end of the list
/// - `400 Bad Request` - Validation error or unknown attribute id
/// - `404 Not Found` - World country does not exist
/// - `409 Conflict` - World country already added, or order taken concurrently
#[tracing::instrument(skip(state, command), fields(country_world_id = command.country_world_id))]
async fn create_country(
    State(state): State<FeatureState>,
    Json(command): Json<CreateCountryCommand>,
) -> Result<Response, CountryApiError> {
    let response = super::commands::create::handle(state.db, state.ordering.as_ref(), command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// `DELETE /api/v1/countries/:id`
#[tracing::instrument(skip(state))]
async fn delete_country(
    State(state): State<FeatureState>,
    Path(id): Path<i32>,
) -> Result<Response, CountryApiError> {
    let response = super::commands::delete::handle(state.db, DeleteCountryCommand { id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// `POST /api/v1/countries/reorder`
///
/// ```json
/// { "countries": [{ "id": 3, "order": 1 }, { "id": 1, "order": 3 }] }
/// ```
#[tracing::instrument(skip(state, command), fields(batch_len = command.countries.len()))]
async fn reorder_countries(
    State(state): State<FeatureState>,
    Json(command): Json<ReorderCountriesCommand>,
) -> Result<Response, CountryApiError> {
    let response = super::commands::reorder::handle(state.db, state.ordering.as_ref(), command).await?;
    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// `GET /api/v1/countries/:id`
#[tracing::instrument(skip(state))]
async fn get_country(
    State(state): State<FeatureState>,
    Path(id): Path<i32>,
) -> Result<Response, CountryApiError> {
    let response = super::queries::get::handle(state.db, GetCountryQuery { id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// `GET /api/v1/countries`
///
/// # Query Parameters
///
/// - `search` - Name in English or Arabic; aliases and spelling variants match
/// - `page` - Page number (default: 1)
/// - `per_page` - Items per page (default: 20, max: 100)
#[tracing::instrument(skip(state, query), fields(page = ?query.page, search = ?query.search))]
async fn list_countries(
    State(state): State<FeatureState>,
    Query(query): Query<ListCountriesQuery>,
) -> Result<Response, CountryApiError> {
    let response = super::queries::list::handle(state.db, &state.aliases, query).await?;
    let (items, meta) = response.into_parts();
    Ok(ApiResponse::success_with_meta(items, meta).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum CountryApiError {
    Create(CreateCountryError),
    Delete(DeleteCountryError),
    Reorder(ReorderCountriesError),
    Get(GetCountryError),
    List(ListCountriesError),
}

impl From<CreateCountryError> for CountryApiError {
    fn from(err: CreateCountryError) -> Self {
        Self::Create(err)
    }
}

impl From<DeleteCountryError> for CountryApiError {
    fn from(err: DeleteCountryError) -> Self {
        Self::Delete(err)
    }
}

impl From<ReorderCountriesError> for CountryApiError {
    fn from(err: ReorderCountriesError) -> Self {
        Self::Reorder(err)
    }
}

impl From<GetCountryError> for CountryApiError {
    fn from(err: GetCountryError) -> Self {
        Self::Get(err)
    }
}

impl From<ListCountriesError> for CountryApiError {
    fn from(err: ListCountriesError) -> Self {
        Self::List(err)
    }
}

fn validation_error(message: String) -> Response {
    ErrorResponse::new("VALIDATION_ERROR", message).into_response_with(StatusCode::BAD_REQUEST)
}

fn not_found(message: String) -> Response {
    ErrorResponse::new("NOT_FOUND", message).into_response_with(StatusCode::NOT_FOUND)
}

impl IntoResponse for CountryApiError {
    fn into_response(self) -> Response {
        match self {
            CountryApiError::Create(CreateCountryError::UnknownAttributes(ids)) => {
                ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    format!("Unknown attribute id(s): {:?}", ids),
                    json!({ "unknown_attribute_ids": ids }),
                )
                .into_response_with(StatusCode::BAD_REQUEST)
            },
            CountryApiError::Create(
                e @ (CreateCountryError::InvalidCountryWorldId
                | CreateCountryError::InvalidAttributeId(_)
                | CreateCountryError::DuplicateAttribute(_)
                | CreateCountryError::ValueValidation(_)),
            ) => validation_error(e.to_string()),
            CountryApiError::Create(e @ CreateCountryError::CountryWorldNotFound(_)) => {
                not_found(e.to_string())
            },
            CountryApiError::Create(e @ CreateCountryError::DuplicateCountryWorld(_)) => {
                ErrorResponse::new("CONFLICT", e.to_string()).into_response_with(StatusCode::CONFLICT)
            },
            CountryApiError::Create(CreateCountryError::Ordering(e))
            | CountryApiError::Reorder(ReorderCountriesError::Ordering(e)) => {
                ordering_error_response(e)
            },
            CountryApiError::List(ListCountriesError::Pagination(e)) => {
                validation_error(e.to_string())
            },
            CountryApiError::Delete(e @ DeleteCountryError::NotFound(_)) => not_found(e.to_string()),
            CountryApiError::Get(e @ GetCountryError::NotFound(_)) => not_found(e.to_string()),
            CountryApiError::Create(CreateCountryError::Database(e)) => {
                database_error("country creation", &e)
            },
            CountryApiError::Delete(DeleteCountryError::Database(e)) => {
                database_error("country deletion", &e)
            },
            CountryApiError::Reorder(ReorderCountriesError::Database(e)) => {
                database_error("country reorder", &e)
            },
            CountryApiError::Get(GetCountryError::Database(e)) => {
                database_error("country retrieval", &e)
            },
            CountryApiError::List(ListCountriesError::Database(e)) => {
                database_error("country listing", &e)
            },
        }
    }
}
