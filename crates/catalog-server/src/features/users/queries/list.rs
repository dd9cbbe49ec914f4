//! List users query
//!
//! Read-only listing for the admin panel. `sort_by` accepts
//! `createdAt | email | firstName | lastName` (or their column names) and
//! defaults to `createdAt DESC`. `search` matches email, first name or
//! last name through the locale-aware normalizer. The password column is
//! never selected.

use catalog_common::search::{expand_search_terms, AliasTable, SearchTerms};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::features::shared::pagination::{Paginated, PaginationError, PaginationParams};
use crate::features::shared::search_filter::push_search_condition;
use crate::features::shared::sorting::{order_by_clause, SortError, USER_SORT_KEYS};

const USER_SEARCH_COLUMNS: &[&str] = &["email", "first_name", "last_name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
    #[serde(default, alias = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default, alias = "sortOrder")]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserListItem {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type ListUsersResponse = Paginated<UserListItem>;

#[derive(Debug, thiserror::Error)]
pub enum ListUsersError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListUsersQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    /// Validates the query and resolves the `ORDER BY` body
    pub fn validate(&self) -> Result<String, ListUsersError> {
        self.pagination().validate()?;
        let field = USER_SORT_KEYS.resolve(self.sort_by.as_deref(), self.sort_order.as_deref())?;
        Ok(order_by_clause(&[field]))
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ListUsersQuery, terms: &SearchTerms) {
    qb.push(" WHERE TRUE");
    if let Some(role) = query.role {
        qb.push(" AND role = ").push_bind(role.as_str());
    }
    if let Some(is_active) = query.is_active {
        qb.push(" AND is_active = ").push_bind(is_active);
    }
    push_search_condition(qb, terms, USER_SEARCH_COLUMNS);
}

#[tracing::instrument(skip(pool, aliases, query), fields(page = ?query.page, sort_by = ?query.sort_by))]
pub async fn handle(
    pool: PgPool,
    aliases: &AliasTable,
    query: ListUsersQuery,
) -> Result<ListUsersResponse, ListUsersError> {
    let order_by = query.validate()?;
    let pagination = query.pagination();
    let terms = expand_search_terms(query.search.as_deref().unwrap_or_default(), aliases);

    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
    push_filters(&mut count, &query, &terms);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select = QueryBuilder::<Postgres>::new(
        "SELECT id, email, first_name, last_name, role, is_active, created_at, updated_at FROM users",
    );
    push_filters(&mut select, &query, &terms);
    select
        .push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(pagination.per_page())
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    let items: Vec<UserListItem> = select.build_query_as().fetch_all(&pool).await?;

    tracing::debug!(count = items.len(), total, "Users listed");
    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sort_is_newest_first() {
        let order_by = ListUsersQuery::default().validate().unwrap();
        assert_eq!(order_by, "created_at DESC, id ASC");
    }

    #[test]
    fn test_camel_case_sort_key() {
        let query = ListUsersQuery {
            sort_by: Some("lastName".to_string()),
            sort_order: Some("ASC".to_string()),
            ..Default::default()
        };
        assert_eq!(query.validate().unwrap(), "last_name ASC, id ASC");
    }

    #[test]
    fn test_unknown_sort_key_rejected() {
        let query = ListUsersQuery {
            sort_by: Some("password".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.validate(), Err(ListUsersError::Sort(_))));
    }

    #[test]
    fn test_role_filter_parses() {
        let query: ListUsersQuery =
            serde_json::from_str(r#"{"role": "admin", "isActive": true}"#).unwrap();
        assert_eq!(query.role, Some(UserRole::Admin));
        assert_eq!(query.is_active, Some(true));
    }

    #[test]
    fn test_filters_sql() {
        let query = ListUsersQuery {
            role: Some(UserRole::User),
            ..Default::default()
        };
        let terms = expand_search_terms("", &AliasTable::empty());
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut qb, &query, &terms);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM users WHERE TRUE AND role = $1");
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_search_normalizes_arabic_names(pool: PgPool) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (email, password, first_name, last_name, role)
            VALUES ('amira@example.com', 'x', 'أميرة', 'حسن', 'admin'),
                   ('omar@example.com', 'x', 'Omar', 'Saleh', 'user')
            "#,
        )
        .execute(&pool)
        .await?;

        let query = ListUsersQuery {
            search: Some("اميره".to_string()),
            ..Default::default()
        };
        let result = handle(pool, &AliasTable::default(), query).await.unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].email, "amira@example.com");
        Ok(())
    }
}
