use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::contact_requests::types::{ContactRequestRecord, CONTACT_REQUEST_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetContactRequestQuery {
    pub id: i32,
}

pub type GetContactRequestResponse = ContactRequestRecord;

#[derive(Debug, thiserror::Error)]
pub enum GetContactRequestError {
    #[error("Contact request with id {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(contact_request_id = query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetContactRequestQuery,
) -> Result<GetContactRequestResponse, GetContactRequestError> {
    let sql = format!("SELECT {} FROM contact_requests WHERE id = $1", CONTACT_REQUEST_COLUMNS);
    sqlx::query_as::<_, ContactRequestRecord>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetContactRequestError::NotFound(query.id))
}
