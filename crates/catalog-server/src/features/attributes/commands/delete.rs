//! Delete attribute command
//!
//! Remaining attributes keep their order; the gap stays.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAttributeCommand {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAttributeResponse {
    pub id: i32,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAttributeError {
    #[error("Attribute with id {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(attribute_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteAttributeCommand,
) -> Result<DeleteAttributeResponse, DeleteAttributeError> {
    let result = sqlx::query("DELETE FROM attributes WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteAttributeError::NotFound(command.id));
    }

    tracing::info!("Attribute deleted");
    Ok(DeleteAttributeResponse {
        id: command.id,
        deleted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_delete_leaves_gap(pool: PgPool) -> sqlx::Result<()> {
        let mut ids = Vec::new();
        for order in 1..=3 {
            let id = sqlx::query_scalar::<_, i32>(
                r#"INSERT INTO attributes (name_en, "order") VALUES ($1, $2) RETURNING id"#,
            )
            .bind(format!("Attribute {}", order))
            .bind(order)
            .fetch_one(&pool)
            .await?;
            ids.push(id);
        }

        handle(pool.clone(), DeleteAttributeCommand { id: ids[1] }).await.unwrap();

        let orders = sqlx::query_scalar::<_, i32>(r#"SELECT "order" FROM attributes ORDER BY "order""#)
            .fetch_all(&pool)
            .await?;
        assert_eq!(orders, vec![1, 3]);

        let again = handle(pool, DeleteAttributeCommand { id: ids[1] }).await;
        assert!(matches!(again, Err(DeleteAttributeError::NotFound(_))));
        Ok(())
    }
}
