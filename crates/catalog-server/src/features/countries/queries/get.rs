use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::countries::types::{
    CountryAttributeValue, CountryDetail, CountryListItem, CountryRow, COUNTRY_SELECT,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCountryQuery {
    pub id: i32,
}

pub type GetCountryResponse = CountryDetail;

#[derive(Debug, thiserror::Error)]
pub enum GetCountryError {
    #[error("Country with id {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Load a country with its attribute values, ordered like the attributes
pub(crate) async fn fetch_detail(pool: &PgPool, id: i32) -> Result<Option<CountryDetail>, sqlx::Error> {
    let sql = format!("{} WHERE c.id = $1", COUNTRY_SELECT);
    let Some(row) = sqlx::query_as::<_, CountryRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let attributes = sqlx::query_as::<_, CountryAttributeValue>(
        r#"
        SELECT ca.id, ca.attribute_id, a.name_en AS attribute_name_en,
               a.name_ar AS attribute_name_ar, ca.value_en, ca.value_ar
        FROM country_attributes ca
        JOIN attributes a ON a.id = ca.attribute_id
        WHERE ca.country_id = $1
        ORDER BY a."order" ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(CountryDetail {
        country: CountryListItem::from(row),
        attributes,
    }))
}

#[tracing::instrument(skip(pool), fields(country_id = query.id))]
pub async fn handle(pool: PgPool, query: GetCountryQuery) -> Result<GetCountryResponse, GetCountryError> {
    fetch_detail(&pool, query.id)
        .await?
        .ok_or(GetCountryError::NotFound(query.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_missing_country(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool, GetCountryQuery { id: 12 }).await;
        assert!(matches!(result, Err(GetCountryError::NotFound(12))));
        Ok(())
    }
}
