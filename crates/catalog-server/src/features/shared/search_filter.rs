//! SQL side of the locale-aware search
//!
//! Turns [`SearchTerms`] into a predicate over one or more text columns:
//!
//! ```sql
//! (catalog_search_key(col) LIKE ANY($keys) OR col ILIKE ANY($raw) OR ...)
//! ```
//!
//! `catalog_search_key` is defined by the migrations and mirrors
//! [`catalog_common::search::search_key`]. Column names are always
//! `&'static str` chosen by the query, never caller input.

use catalog_common::search::SearchTerms;
use sqlx::{Postgres, QueryBuilder};

/// Escape `LIKE` metacharacters and wrap in `%..%`
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Bound patterns for one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPatterns {
    keys: Vec<String>,
    raw: Vec<String>,
}

impl SearchPatterns {
    /// `None` for an empty term set, so callers skip the predicate entirely
    pub fn from_terms(terms: &SearchTerms) -> Option<Self> {
        if terms.is_empty() {
            return None;
        }
        Some(Self {
            keys: terms.search_keys().iter().map(|k| like_pattern(k)).collect(),
            raw: terms.raw_terms().iter().map(|t| like_pattern(t)).collect(),
        })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Append the parenthesized OR predicate over `columns`
    pub fn push_predicate(&self, qb: &mut QueryBuilder<'_, Postgres>, columns: &[&'static str]) {
        qb.push("(");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push("catalog_search_key(")
                .push(*column)
                .push(") LIKE ANY(")
                .push_bind(self.keys.clone())
                .push(") OR ")
                .push(*column)
                .push(" ILIKE ANY(")
                .push_bind(self.raw.clone())
                .push(")");
        }
        qb.push(")");
    }
}

/// Append `AND <predicate>` when `terms` is non-empty
pub fn push_search_condition(
    qb: &mut QueryBuilder<'_, Postgres>,
    terms: &SearchTerms,
    columns: &[&'static str],
) {
    if let Some(patterns) = SearchPatterns::from_terms(terms) {
        qb.push(" AND ");
        patterns.push_predicate(qb, columns);
    }
}
