use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::attributes::types::{AttributeRecord, ATTRIBUTE_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAttributeQuery {
    pub id: i32,
}

pub type GetAttributeResponse = AttributeRecord;

#[derive(Debug, thiserror::Error)]
pub enum GetAttributeError {
    #[error("Attribute with id {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(attribute_id = query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetAttributeQuery,
) -> Result<GetAttributeResponse, GetAttributeError> {
    let sql = format!("SELECT {} FROM attributes WHERE id = $1", ATTRIBUTE_COLUMNS);
    sqlx::query_as::<_, AttributeRecord>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetAttributeError::NotFound(query.id))
}
