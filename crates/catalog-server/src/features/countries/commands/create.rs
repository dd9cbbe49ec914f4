//! Create country command
//!
//! A country wraps one entry of the world catalogue and is appended at the
//! end of the country list. Its attribute values are written in the same
//! transaction as the country row.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;

use crate::features::countries::queries::get::fetch_detail;
use crate::features::countries::types::{CountryDetail, MAX_ATTRIBUTE_VALUE_LENGTH};
use crate::features::shared::error_helpers::violated_constraint;
use crate::features::shared::validation::{
    is_valid_id, validate_required_text, FieldValidationError,
};
use crate::ordering::{Collection, OrderStore, OrderingEngine, OrderingError};

const COUNTRY_WORLD_UNIQUE: &str = "countries_country_world_id_key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryAttributeInput {
    pub attribute_id: i32,
    pub value_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_ar: Option<String>,
}

/// Command to add a country
///
/// ```json
/// {
///   "country_world_id": 12,
///   "attributes": [{ "attribute_id": 1, "value_en": "30 days", "value_ar": "30 يوم" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCountryCommand {
    pub country_world_id: i32,
    #[serde(default)]
    pub attributes: Vec<CountryAttributeInput>,
}

pub type CreateCountryResponse = CountryDetail;

#[derive(Debug, thiserror::Error)]
pub enum CreateCountryError {
    #[error("country_world_id must be a positive id")]
    InvalidCountryWorldId,

    #[error("attribute_id {0} is invalid")]
    InvalidAttributeId(i32),

    #[error("Attribute {0} is listed more than once")]
    DuplicateAttribute(i32),

    #[error("Attribute value validation failed: {0}")]
    ValueValidation(#[from] FieldValidationError),

    #[error("World country {0} not found")]
    CountryWorldNotFound(i32),

    #[error("Unknown attribute id(s): {0:?}")]
    UnknownAttributes(Vec<i32>),

    #[error("A country for world country {0} already exists")]
    DuplicateCountryWorld(i32),

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateCountryCommand {
    pub fn validate(&self) -> Result<(), CreateCountryError> {
        if !is_valid_id(self.country_world_id) {
            return Err(CreateCountryError::InvalidCountryWorldId);
        }

        let mut seen = HashSet::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            if !is_valid_id(attribute.attribute_id) {
                return Err(CreateCountryError::InvalidAttributeId(attribute.attribute_id));
            }
            if !seen.insert(attribute.attribute_id) {
                return Err(CreateCountryError::DuplicateAttribute(attribute.attribute_id));
            }
            validate_required_text("value_en", &attribute.value_en, MAX_ATTRIBUTE_VALUE_LENGTH)?;
            if let Some(value_ar) = &attribute.value_ar {
                validate_required_text("value_ar", value_ar, MAX_ATTRIBUTE_VALUE_LENGTH)?;
            }
        }
        Ok(())
    }
}

#[tracing::instrument(
    skip(pool, ordering, command),
    fields(country_world_id = command.country_world_id, attributes = command.attributes.len())
)]
pub async fn handle<S: OrderStore>(
    pool: PgPool,
    ordering: &OrderingEngine<S>,
    command: CreateCountryCommand,
) -> Result<CreateCountryResponse, CreateCountryError> {
    command.validate()?;

    let order = ordering.assign_next_order(Collection::Countries).await?;

    let mut tx = pool.begin().await?;

    let world_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM countries_world WHERE id = $1)")
            .bind(command.country_world_id)
            .fetch_one(&mut *tx)
            .await?;
    if !world_exists {
        return Err(CreateCountryError::CountryWorldNotFound(command.country_world_id));
    }

    let attribute_ids: Vec<i32> = command.attributes.iter().map(|a| a.attribute_id).collect();
    if !attribute_ids.is_empty() {
        let found: HashSet<i32> =
            sqlx::query_scalar::<_, i32>("SELECT id FROM attributes WHERE id = ANY($1)")
                .bind(&attribute_ids)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();
        let mut unknown: Vec<i32> = attribute_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(CreateCountryError::UnknownAttributes(unknown));
        }
    }

    let country_id = sqlx::query_scalar::<_, i32>(
        r#"INSERT INTO countries (country_world_id, "order") VALUES ($1, $2) RETURNING id"#,
    )
    .bind(command.country_world_id)
    .bind(order)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if violated_constraint(&e) == Some(COUNTRY_WORLD_UNIQUE) {
            CreateCountryError::DuplicateCountryWorld(command.country_world_id)
        } else {
            OrderingError::from_insert(e, Collection::Countries).into()
        }
    })?;

    if !command.attributes.is_empty() {
        let values_en: Vec<&str> = command.attributes.iter().map(|a| a.value_en.trim()).collect();
        let values_ar: Vec<Option<&str>> = command
            .attributes
            .iter()
            .map(|a| a.value_ar.as_deref().map(str::trim))
            .collect();

        sqlx::query(
            r#"
            INSERT INTO country_attributes (country_id, attribute_id, value_en, value_ar)
            SELECT $1, v.attribute_id, v.value_en, v.value_ar
            FROM UNNEST($2::INT4[], $3::TEXT[], $4::TEXT[]) AS v(attribute_id, value_en, value_ar)
            "#,
        )
        .bind(country_id)
        .bind(&attribute_ids)
        .bind(&values_en)
        .bind(&values_ar)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(country_id, order, "Country created");

    fetch_detail(&pool, country_id)
        .await?
        .ok_or(CreateCountryError::Database(sqlx::Error::RowNotFound))
}
