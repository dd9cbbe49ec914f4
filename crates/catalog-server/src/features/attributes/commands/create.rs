//! Create attribute command
//!
//! New attributes are appended: their `order` is one past the current
//! maximum. That value is not locked, so a concurrent create can take it
//! first; the unique constraint on `order` then rejects this insert and the
//! caller gets a conflict to retry.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::attributes::types::{AttributeRecord, ATTRIBUTE_COLUMNS, MAX_ATTRIBUTE_NAME_LENGTH};
use crate::features::shared::validation::{validate_name, validate_optional_name, NameValidationError};
use crate::ordering::{Collection, OrderStore, OrderingEngine, OrderingError};

/// Command to create a new attribute
///
/// # Examples
///
/// ```rust,ignore
/// let command = CreateAttributeCommand {
///     name_en: "Processing time".to_string(),
///     name_ar: Some("مدة المعالجة".to_string()),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttributeCommand {
    pub name_en: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
}

pub type CreateAttributeResponse = AttributeRecord;

/// Errors that can occur when creating an attribute
#[derive(Debug, thiserror::Error)]
pub enum CreateAttributeError {
    #[error("Name validation failed: {0}")]
    NameValidation(#[from] NameValidationError),

    #[error(transparent)]
    Ordering(#[from] OrderingError),
}

impl CreateAttributeCommand {
    pub fn validate(&self) -> Result<(), CreateAttributeError> {
        validate_name(&self.name_en, MAX_ATTRIBUTE_NAME_LENGTH)?;
        validate_optional_name(self.name_ar.as_deref(), MAX_ATTRIBUTE_NAME_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, ordering, command), fields(name_en = %command.name_en))]
pub async fn handle<S: OrderStore>(
    pool: PgPool,
    ordering: &OrderingEngine<S>,
    command: CreateAttributeCommand,
) -> Result<CreateAttributeResponse, CreateAttributeError> {
    command.validate()?;

    let order = ordering.assign_next_order(Collection::Attributes).await?;

    let sql = format!(
        r#"INSERT INTO attributes (name_en, name_ar, "order") VALUES ($1, $2, $3) RETURNING {}"#,
        ATTRIBUTE_COLUMNS
    );
    let record = sqlx::query_as::<_, AttributeRecord>(&sql)
        .bind(command.name_en.trim())
        .bind(command.name_ar.as_deref().map(str::trim))
        .bind(order)
        .fetch_one(&pool)
        .await
        .map_err(|e| OrderingError::from_insert(e, Collection::Attributes))?;

    tracing::info!(attribute_id = record.id, order = record.order, "Attribute created");
    Ok(record)
}
