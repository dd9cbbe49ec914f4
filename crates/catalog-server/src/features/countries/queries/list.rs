//! List countries query
//!
//! Countries come back ascending by `order`. The optional `search` goes
//! through alias expansion and matches the world catalogue's English or
//! Arabic name, so `?search=امريكا` finds "الولايات المتحدة".

use catalog_common::search::{expand_search_terms, AliasTable, SearchTerms};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::features::countries::types::{
    CountryListItem, CountryRow, COUNTRY_SEARCH_COLUMNS, COUNTRY_SELECT,
};
use crate::features::shared::pagination::{Paginated, PaginationError, PaginationParams};
use crate::features::shared::search_filter::push_search_condition;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCountriesQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
}

pub type ListCountriesResponse = Paginated<CountryListItem>;

#[derive(Debug, thiserror::Error)]
pub enum ListCountriesError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListCountriesQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<(), ListCountriesError> {
        self.pagination().validate()?;
        Ok(())
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, terms: &SearchTerms) {
    qb.push(" WHERE TRUE");
    push_search_condition(qb, terms, COUNTRY_SEARCH_COLUMNS);
}

/// Every country ascending by `order`, without search or paging
pub(crate) async fn fetch_all_ordered(pool: &PgPool) -> Result<Vec<CountryListItem>, sqlx::Error> {
    let sql = format!(r#"{} ORDER BY c."order" ASC"#, COUNTRY_SELECT);
    let rows = sqlx::query_as::<_, CountryRow>(&sql).fetch_all(pool).await?;
    Ok(rows.into_iter().map(CountryListItem::from).collect())
}

#[tracing::instrument(skip(pool, aliases), fields(search = ?query.search))]
pub async fn handle(
    pool: PgPool,
    aliases: &AliasTable,
    query: ListCountriesQuery,
) -> Result<ListCountriesResponse, ListCountriesError> {
    query.validate()?;

    let pagination = query.pagination();
    let terms = expand_search_terms(query.search.as_deref().unwrap_or_default(), aliases);
    tracing::debug!(terms = terms.len(), "Expanded country search");

    let mut count = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*) FROM countries c JOIN countries_world w ON w.id = c.country_world_id",
    );
    push_filters(&mut count, &terms);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select = QueryBuilder::<Postgres>::new(COUNTRY_SELECT);
    push_filters(&mut select, &terms);
    select
        .push(r#" ORDER BY c."order" ASC LIMIT "#)
        .push_bind(pagination.per_page())
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    let rows: Vec<CountryRow> = select.build_query_as().fetch_all(&pool).await?;

    let items = rows.into_iter().map(CountryListItem::from).collect();
    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_page() {
        let query = ListCountriesQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            query.validate(),
            Err(ListCountriesError::Pagination(PaginationError::InvalidPage))
        ));
    }

    #[test]
    fn test_query_string_fields() {
        let query: ListCountriesQuery =
            serde_json::from_str(r#"{"page": 2, "search": "uk"}"#).unwrap();
        assert_eq!(query.pagination().page(), 2);
        assert_eq!(query.pagination().per_page(), 20);
        assert_eq!(query.search.as_deref(), Some("uk"));
    }

    async fn seed(pool: &PgPool, countries: &[(&str, &str)]) -> sqlx::Result<()> {
        for (order, (name_en, name_ar)) in countries.iter().enumerate() {
            let world_id = sqlx::query_scalar::<_, i32>(
                "INSERT INTO countries_world (name_en, name_ar) VALUES ($1, $2) RETURNING id",
            )
            .bind(name_en)
            .bind(name_ar)
            .fetch_one(pool)
            .await?;
            sqlx::query(r#"INSERT INTO countries (country_world_id, "order") VALUES ($1, $2)"#)
                .bind(world_id)
                .bind(order as i32 + 1)
                .execute(pool)
                .await?;
        }
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_search_expands_aliases(pool: PgPool) -> sqlx::Result<()> {
        seed(
            &pool,
            &[
                ("United States", "الولايات المتحدة"),
                ("Egypt", "مصر"),
                ("United Kingdom", "المملكة المتحدة"),
            ],
        )
        .await?;
        let aliases = AliasTable::default();

        let query = ListCountriesQuery {
            search: Some("أمريكا".to_string()),
            ..Default::default()
        };
        let result = handle(pool.clone(), &aliases, query).await.unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].country_world.name_en, "United States");

        let query = ListCountriesQuery {
            search: Some("uk".to_string()),
            ..Default::default()
        };
        let result = handle(pool, &aliases, query).await.unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].country_world.name_ar, "المملكة المتحدة");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_list_pages_in_order(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool, &[("Egypt", "مصر"), ("Jordan", "الأردن"), ("Oman", "عمان")]).await?;

        let query = ListCountriesQuery {
            page: Some(2),
            per_page: Some(2),
            search: None,
        };
        let result = handle(pool, &AliasTable::default(), query).await.unwrap();
        assert_eq!(result.pagination.total, 3);
        assert!(result.pagination.has_prev);
        assert!(!result.pagination.has_next);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].order, 3);
        Ok(())
    }
}
