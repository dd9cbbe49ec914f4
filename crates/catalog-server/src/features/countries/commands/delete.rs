//! Delete country command
//!
//! Attribute values go with the country (`ON DELETE CASCADE`). Other
//! countries keep their order.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCountryCommand {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCountryResponse {
    pub id: i32,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCountryError {
    #[error("Country with id {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(country_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteCountryCommand,
) -> Result<DeleteCountryResponse, DeleteCountryError> {
    let result = sqlx::query("DELETE FROM countries WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteCountryError::NotFound(command.id));
    }

    tracing::info!("Country deleted");
    Ok(DeleteCountryResponse {
        id: command.id,
        deleted: true,
    })
}
