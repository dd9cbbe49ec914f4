use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteContactRequestCommand {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteContactRequestResponse {
    pub id: i32,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteContactRequestError {
    #[error("Contact request with id {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool), fields(contact_request_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteContactRequestCommand,
) -> Result<DeleteContactRequestResponse, DeleteContactRequestError> {
    let result = sqlx::query("DELETE FROM contact_requests WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteContactRequestError::NotFound(command.id));
    }

    tracing::info!("Contact request deleted");
    Ok(DeleteContactRequestResponse {
        id: command.id,
        deleted: true,
    })
}
