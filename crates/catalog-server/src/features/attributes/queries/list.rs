//! List attributes query
//!
//! Attributes are a short, admin-curated list, so the listing is the whole
//! collection in `order`, unpaginated.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::attributes::types::{AttributeRecord, ATTRIBUTE_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAttributesQuery {}

pub type ListAttributesResponse = Vec<AttributeRecord>;

#[derive(Debug, thiserror::Error)]
pub enum ListAttributesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Every attribute ascending by `order`
pub(crate) async fn fetch_all_ordered(pool: &PgPool) -> Result<Vec<AttributeRecord>, sqlx::Error> {
    let sql = format!(
        r#"SELECT {} FROM attributes ORDER BY "order" ASC"#,
        ATTRIBUTE_COLUMNS
    );
    sqlx::query_as::<_, AttributeRecord>(&sql)
        .fetch_all(pool)
        .await
}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListAttributesQuery,
) -> Result<ListAttributesResponse, ListAttributesError> {
    let attributes = fetch_all_ordered(&pool).await?;
    tracing::debug!(count = attributes.len(), "Attributes listed");
    Ok(attributes)
}
