//! List contact requests query
//!
//! # Parameters
//!
//! - `sort` - `"createdAt:desc,name:asc"`; keys from a fixed table, default `createdAt:desc`
//! - `search` - matched against name, phone number, nationality and destination
//! - `destination_country`, `nationality` - alias-expanded filters
//! - `start_date`, `end_date` - RFC 3339 timestamps or `YYYY-MM-DD` dates (UTC);
//!   a date-only `end_date` covers that whole day
//! - `page`, `per_page` (`limit` is accepted for `per_page`)

use catalog_common::search::{expand_search_terms, AliasTable};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::features::contact_requests::types::{
    ContactRequestRecord, CONTACT_REQUEST_COLUMNS, CONTACT_REQUEST_SEARCH_COLUMNS,
};
use crate::features::shared::pagination::{Paginated, PaginationError, PaginationParams};
use crate::features::shared::search_filter::push_search_condition;
use crate::features::shared::sorting::{order_by_clause, SortError, CONTACT_REQUEST_SORT_KEYS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListContactRequestsQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default, alias = "limit")]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub destination_country: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

pub type ListContactRequestsResponse = Paginated<ContactRequestRecord>;

#[derive(Debug, thiserror::Error)]
pub enum ListContactRequestsError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error("Invalid {field} '{value}': expected RFC 3339 timestamp or YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("start_date must not be after end_date")]
    InvalidDateRange,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Upper or lower limit on `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// `created_at >= at` / `created_at <= at`
    Inclusive(DateTime<Utc>),
    /// `created_at < at`, used for a date-only end
    Exclusive(DateTime<Utc>),
}

impl DateBound {
    fn at(&self) -> DateTime<Utc> {
        match self {
            DateBound::Inclusive(at) | DateBound::Exclusive(at) => *at,
        }
    }
}

/// Returns the instant and whether the input was a bare date
fn parse_timestamp(
    field: &'static str,
    value: &str,
) -> Result<(DateTime<Utc>, bool), ListContactRequestsError> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok((at.with_timezone(&Utc), false));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| (midnight.and_utc(), true))
        .ok_or_else(|| ListContactRequestsError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// Parse a `start_date`; a date means midnight UTC of that day
pub fn parse_start_date(value: &str) -> Result<DateBound, ListContactRequestsError> {
    let (at, _) = parse_timestamp("start_date", value)?;
    Ok(DateBound::Inclusive(at))
}

/// Parse an `end_date`; a date covers that whole day
pub fn parse_end_date(value: &str) -> Result<DateBound, ListContactRequestsError> {
    match parse_timestamp("end_date", value)? {
        (at, false) => Ok(DateBound::Inclusive(at)),
        (midnight, true) => midnight
            .checked_add_days(Days::new(1))
            .map(DateBound::Exclusive)
            .ok_or_else(|| ListContactRequestsError::InvalidDate {
                field: "end_date",
                value: value.to_string(),
            }),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validated filters, ready to be pushed into SQL
#[derive(Debug, Clone, Default)]
pub struct ContactRequestFilters {
    pub start: Option<DateBound>,
    pub end: Option<DateBound>,
    pub order_by: String,
}

impl ListContactRequestsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<ContactRequestFilters, ListContactRequestsError> {
        self.pagination().validate()?;
        let sort = CONTACT_REQUEST_SORT_KEYS.parse(self.sort.as_deref())?;

        let start = non_blank(&self.start_date).map(parse_start_date).transpose()?;
        let end = non_blank(&self.end_date).map(parse_end_date).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            let empty = match end {
                DateBound::Inclusive(at) => start.at() > at,
                DateBound::Exclusive(at) => start.at() >= at,
            };
            if empty {
                return Err(ListContactRequestsError::InvalidDateRange);
            }
        }

        Ok(ContactRequestFilters {
            start,
            end,
            order_by: order_by_clause(&sort),
        })
    }
}

fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    query: &ListContactRequestsQuery,
    filters: &ContactRequestFilters,
    aliases: &AliasTable,
) {
    qb.push(" WHERE TRUE");

    let search = expand_search_terms(query.search.as_deref().unwrap_or_default(), aliases);
    push_search_condition(qb, &search, CONTACT_REQUEST_SEARCH_COLUMNS);

    if let Some(destination) = query.destination_country.as_deref() {
        let terms = expand_search_terms(destination, aliases);
        push_search_condition(qb, &terms, &["destination_country"]);
    }
    if let Some(nationality) = query.nationality.as_deref() {
        let terms = expand_search_terms(nationality, aliases);
        push_search_condition(qb, &terms, &["nationality"]);
    }

    // both bounds together read as BETWEEN
    if let Some(start) = filters.start {
        qb.push(" AND created_at >= ").push_bind(start.at());
    }
    match filters.end {
        Some(DateBound::Inclusive(at)) => {
            qb.push(" AND created_at <= ").push_bind(at);
        },
        Some(DateBound::Exclusive(at)) => {
            qb.push(" AND created_at < ").push_bind(at);
        },
        None => {},
    }
}

#[tracing::instrument(skip(pool, aliases, query), fields(page = ?query.page, sort = ?query.sort))]
pub async fn handle(
    pool: PgPool,
    aliases: &AliasTable,
    query: ListContactRequestsQuery,
) -> Result<ListContactRequestsResponse, ListContactRequestsError> {
    let filters = query.validate()?;
    let pagination = query.pagination();

    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contact_requests");
    push_filters(&mut count, &query, &filters, aliases);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM contact_requests",
        CONTACT_REQUEST_COLUMNS
    ));
    push_filters(&mut select, &query, &filters, aliases);
    select
        .push(" ORDER BY ")
        .push(&filters.order_by)
        .push(" LIMIT ")
        .push_bind(pagination.per_page())
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    let items: Vec<ContactRequestRecord> = select.build_query_as().fetch_all(&pool).await?;

    tracing::debug!(count = items.len(), total, "Contact requests listed");
    Ok(Paginated::from_items(items, &pagination, total))
}
