//! Reorder attributes command
//!
//! Body: `{"attributes": [{"id": 1, "order": 4}, {"id": 4, "order": 1}]}`.
//! Every listed attribute moves to its target in one transaction; the rest
//! keep their positions. Returns the full list in the new order.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::attributes::queries::list::fetch_all_ordered;
use crate::features::attributes::types::AttributeRecord;
use crate::ordering::{
    arrange, validate_batch, Collection, OrderAssignment, OrderStore, OrderingEngine, OrderingError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderAttributesCommand {
    pub attributes: Vec<OrderAssignment>,
}

pub type ReorderAttributesResponse = Vec<AttributeRecord>;

#[derive(Debug, thiserror::Error)]
pub enum ReorderAttributesError {
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ReorderAttributesCommand {
    pub fn validate(&self, max_batch: usize) -> Result<(), ReorderAttributesError> {
        validate_batch(&self.attributes, max_batch)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, ordering, command), fields(batch_len = command.attributes.len()))]
pub async fn handle<S: OrderStore>(
    pool: PgPool,
    ordering: &OrderingEngine<S>,
    command: ReorderAttributesCommand,
) -> Result<ReorderAttributesResponse, ReorderAttributesError> {
    command.validate(ordering.max_batch())?;

    let listed = ordering
        .reorder(Collection::Attributes, &command.attributes)
        .await?;

    let rows = fetch_all_ordered(&pool).await?;
    Ok(arrange(&listed, rows))
}
