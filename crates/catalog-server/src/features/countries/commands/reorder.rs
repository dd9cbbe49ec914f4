//! Reorder countries command
//!
//! Body: `{"countries": [{"id": 3, "order": 1}, ...]}`. Same contract as the
//! attribute reorder, applied to the country collection.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::countries::queries::list::fetch_all_ordered;
use crate::features::countries::types::CountryListItem;
use crate::ordering::{
    arrange, validate_batch, Collection, OrderAssignment, OrderStore, OrderingEngine, OrderingError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderCountriesCommand {
    pub countries: Vec<OrderAssignment>,
}

pub type ReorderCountriesResponse = Vec<CountryListItem>;

#[derive(Debug, thiserror::Error)]
pub enum ReorderCountriesError {
    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ReorderCountriesCommand {
    pub fn validate(&self, max_batch: usize) -> Result<(), ReorderCountriesError> {
        validate_batch(&self.countries, max_batch)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, ordering, command), fields(batch_len = command.countries.len()))]
pub async fn handle<S: OrderStore>(
    pool: PgPool,
    ordering: &OrderingEngine<S>,
    command: ReorderCountriesCommand,
) -> Result<ReorderCountriesResponse, ReorderCountriesError> {
    command.validate(ordering.max_batch())?;

    let listed = ordering
        .reorder(Collection::Countries, &command.countries)
        .await?;

    let rows = fetch_all_ordered(&pool).await?;
    Ok(arrange(&listed, rows))
}
