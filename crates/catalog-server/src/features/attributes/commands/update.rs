//! Update attribute command
//!
//! Only the names change here; position is owned by the reorder command.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::attributes::types::{AttributeRecord, ATTRIBUTE_COLUMNS, MAX_ATTRIBUTE_NAME_LENGTH};
use crate::features::shared::validation::{validate_optional_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAttributeCommand {
    /// Set from the path
    #[serde(skip)]
    pub id: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
}

pub type UpdateAttributeResponse = AttributeRecord;

#[derive(Debug, thiserror::Error)]
pub enum UpdateAttributeError {
    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("Attribute with id {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateAttributeCommand {
    pub fn validate(&self) -> Result<(), UpdateAttributeError> {
        if self.name_en.is_none() && self.name_ar.is_none() {
            return Err(UpdateAttributeError::NoFieldsToUpdate);
        }
        validate_optional_name(self.name_en.as_deref(), MAX_ATTRIBUTE_NAME_LENGTH)?;
        validate_optional_name(self.name_ar.as_deref(), MAX_ATTRIBUTE_NAME_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(attribute_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateAttributeCommand,
) -> Result<UpdateAttributeResponse, UpdateAttributeError> {
    command.validate()?;

    let sql = format!(
        r#"
        UPDATE attributes
        SET name_en = COALESCE($2, name_en),
            name_ar = COALESCE($3, name_ar),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        ATTRIBUTE_COLUMNS
    );
    let record = sqlx::query_as::<_, AttributeRecord>(&sql)
        .bind(command.id)
        .bind(command.name_en.as_deref().map(str::trim))
        .bind(command.name_ar.as_deref().map(str::trim))
        .fetch_optional(&pool)
        .await?
        .ok_or(UpdateAttributeError::NotFound(command.id))?;

    tracing::info!("Attribute updated");
    Ok(record)
}
