//! Sort-key translation for list endpoints
//!
//! Callers name sort keys in camelCase (`firstName`) or snake_case
//! (`first_name`). Each resource owns a fixed [`SortKeys`] table mapping
//! those names to a column; anything not in the table is rejected, so no
//! caller text ever reaches the `ORDER BY` clause.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("Unknown sort key '{key}'. Allowed: {allowed}")]
    UnknownKey { key: String, allowed: String },

    #[error("Invalid sort direction '{0}'. Use 'asc' or 'desc'")]
    InvalidDirection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(SortError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One resolved `ORDER BY` term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortField {
    pub const fn new(column: &'static str, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

/// Fixed caller-key to column table for one resource
#[derive(Debug, Clone, Copy)]
pub struct SortKeys {
    /// (camelCase key, column)
    keys: &'static [(&'static str, &'static str)],
    default: SortField,
}

pub const USER_SORT_KEYS: SortKeys = SortKeys::new(
    &[
        ("createdAt", "created_at"),
        ("email", "email"),
        ("firstName", "first_name"),
        ("lastName", "last_name"),
    ],
    SortField::new("created_at", SortDirection::Desc),
);

pub const CONTACT_REQUEST_SORT_KEYS: SortKeys = SortKeys::new(
    &[
        ("id", "id"),
        ("name", "name"),
        ("nationality", "nationality"),
        ("phoneNumber", "phone_number"),
        ("destinationCountry", "destination_country"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
    SortField::new("created_at", SortDirection::Desc),
);

impl SortKeys {
    pub const fn new(
        keys: &'static [(&'static str, &'static str)],
        default: SortField,
    ) -> Self {
        Self { keys, default }
    }

    /// Column for a caller key, accepting either casing
    pub fn column(&self, key: &str) -> Option<&'static str> {
        let key = key.trim();
        self.keys
            .iter()
            .find(|(camel, column)| *camel == key || *column == key)
            .map(|(_, column)| *column)
    }

    /// Resolve a single key plus optional direction (`sort_by` / `sort_order`)
    pub fn resolve(
        &self,
        key: Option<&str>,
        direction: Option<&str>,
    ) -> Result<SortField, SortError> {
        let column = match key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => self.lookup(key)?,
            None => self.default.column,
        };
        let direction = match direction.map(str::trim).filter(|d| !d.is_empty()) {
            Some(direction) => direction.parse()?,
            None => self.default.direction,
        };
        Ok(SortField::new(column, direction))
    }

    /// Parse `"createdAt:desc,name:asc"`
    ///
    /// A missing direction means ascending. Blank or absent input yields
    /// the table's default. Repeated columns keep their first occurrence.
    pub fn parse(&self, sort: Option<&str>) -> Result<Vec<SortField>, SortError> {
        let mut fields: Vec<SortField> = Vec::new();
        for part in sort.unwrap_or_default().split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, direction) = match part.split_once(':') {
                Some((key, direction)) => (key, direction.parse()?),
                None => (part, SortDirection::Asc),
            };
            let column = self.lookup(key)?;
            if !fields.iter().any(|f| f.column == column) {
                fields.push(SortField::new(column, direction));
            }
        }

        if fields.is_empty() {
            fields.push(self.default);
        }
        Ok(fields)
    }

    fn lookup(&self, key: &str) -> Result<&'static str, SortError> {
        self.column(key).ok_or_else(|| SortError::UnknownKey {
            key: key.trim().to_string(),
            allowed: self
                .keys
                .iter()
                .map(|(camel, _)| *camel)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Render resolved fields as an `ORDER BY` body, with `id` as tiebreaker
pub fn order_by_clause(fields: &[SortField]) -> String {
    let mut parts: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.column, f.direction.as_sql()))
        .collect();
    if !fields.iter().any(|f| f.column == "id") {
        parts.push("id ASC".to_string());
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_accepts_both_casings() {
        assert_eq!(USER_SORT_KEYS.column("firstName"), Some("first_name"));
        assert_eq!(USER_SORT_KEYS.column("first_name"), Some("first_name"));
        assert_eq!(USER_SORT_KEYS.column("password"), None);
    }

    #[test]
    fn test_parse_multiple_keys() {
        let fields = CONTACT_REQUEST_SORT_KEYS
            .parse(Some("createdAt:desc,name:asc"))
            .unwrap();
        assert_eq!(
            fields,
            vec![
                SortField::new("created_at", SortDirection::Desc),
                SortField::new("name", SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn test_parse_defaults() {
        let expected = vec![SortField::new("created_at", SortDirection::Desc)];
        assert_eq!(CONTACT_REQUEST_SORT_KEYS.parse(None).unwrap(), expected);
        assert_eq!(CONTACT_REQUEST_SORT_KEYS.parse(Some(" , ")).unwrap(), expected);
    }

    #[test]
    fn test_parse_missing_direction_is_ascending() {
        let fields = CONTACT_REQUEST_SORT_KEYS.parse(Some("phoneNumber")).unwrap();
        assert_eq!(fields, vec![SortField::new("phone_number", SortDirection::Asc)]);
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        let err = CONTACT_REQUEST_SORT_KEYS
            .parse(Some("name:asc,\"order\"; DROP TABLE users:desc"))
            .unwrap_err();
        assert!(matches!(err, SortError::UnknownKey { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_direction() {
        let err = CONTACT_REQUEST_SORT_KEYS.parse(Some("name:sideways")).unwrap_err();
        assert_eq!(err, SortError::InvalidDirection("sideways".to_string()));
    }

    #[test]
    fn test_parse_keeps_first_occurrence() {
        let fields = CONTACT_REQUEST_SORT_KEYS
            .parse(Some("name:desc,name:asc"))
            .unwrap();
        assert_eq!(fields, vec![SortField::new("name", SortDirection::Desc)]);
    }

    #[test]
    fn test_resolve_single_key() {
        assert_eq!(
            USER_SORT_KEYS.resolve(Some("email"), Some("ASC")).unwrap(),
            SortField::new("email", SortDirection::Asc)
        );
        assert_eq!(
            USER_SORT_KEYS.resolve(None, None).unwrap(),
            SortField::new("created_at", SortDirection::Desc)
        );
        assert!(USER_SORT_KEYS.resolve(Some("role"), None).is_err());
    }

    #[test]
    fn test_order_by_clause() {
        let clause = order_by_clause(&[
            SortField::new("created_at", SortDirection::Desc),
            SortField::new("name", SortDirection::Asc),
        ]);
        assert_eq!(clause, "created_at DESC, name ASC, id ASC");

        let clause = order_by_clause(&[SortField::new("id", SortDirection::Desc)]);
        assert_eq!(clause, "id DESC");
    }
}
