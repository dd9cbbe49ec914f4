use serde::{Deserialize, Serialize};
use std::path::Path;

use super::normalize::search_key;
use crate::error::{CatalogError, Result};

/// One canonical display term and the spellings that should find it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub canonical: String,
    pub aliases: Vec<String>,
}

impl AliasEntry {
    pub fn new<I, S>(canonical: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            canonical: canonical.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledEntry {
    entry: AliasEntry,
    canonical_key: String,
    alias_keys: Vec<String>,
}

impl CompiledEntry {
    fn compile(entry: AliasEntry) -> Self {
        Self {
            canonical_key: search_key(&entry.canonical),
            alias_keys: entry.aliases.iter().map(|a| search_key(a)).collect(),
            entry,
        }
    }

    /// Whether a normalized query falls inside this entry's canonical term
    /// or any of its aliases
    fn is_hit(&self, query_key: &str) -> bool {
        self.canonical_key.contains(query_key)
            || self.alias_keys.iter().any(|alias| alias.contains(query_key))
    }
}

/// Immutable table mapping canonical terms to alternate spellings
///
/// Built once at startup and shared by reference (typically behind an
/// `Arc`). Search keys for every term are computed on construction so
/// expansion does not re-normalize the table per query.
///
/// The JSON form is a list of entries:
///
/// ```json
/// [{ "canonical": "United Kingdom", "aliases": ["uk"] }]
/// ```
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<CompiledEntry>,
}

impl AliasTable {
    /// Build a table, rejecting entries with a blank canonical term
    pub fn new(entries: Vec<AliasEntry>) -> Result<Self> {
        if let Some(bad) = entries.iter().find(|e| e.canonical.trim().is_empty()) {
            return Err(CatalogError::AliasTable(format!(
                "canonical term must not be empty (aliases: {:?})",
                bad.aliases
            )));
        }

        Ok(Self {
            entries: entries.into_iter().map(CompiledEntry::compile).collect(),
        })
    }

    /// Table with no entries; expansion then only yields the query itself
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<AliasEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), entries = table.len(), "Loaded search alias table");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter().map(|c| &c.entry)
    }

    /// Entries whose canonical term or aliases contain `query_key`
    pub(crate) fn hits<'a>(&'a self, query_key: &'a str) -> impl Iterator<Item = &'a AliasEntry> {
        self.entries
            .iter()
            .filter(move |c| c.is_hit(query_key))
            .map(|c| &c.entry)
    }
}

impl Default for AliasTable {
    /// Country-name aliases the admin panel has always shipped with
    fn default() -> Self {
        Self {
            entries: vec![
                AliasEntry::new("الولايات المتحدة", ["أمريكا", "أميركا", "امريكا", "اميركا"]),
                AliasEntry::new("المملكة المتحدة", ["بريطانيا"]),
                AliasEntry::new("United States", ["usa", "america", "amerka", "us"]),
                AliasEntry::new("United Kingdom", ["uk"]),
            ]
            .into_iter()
            .map(CompiledEntry::compile)
            .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_contents() {
        let table = AliasTable::default();
        assert_eq!(table.len(), 4);
        let us = table
            .entries()
            .find(|e| e.canonical == "United States")
            .unwrap();
        assert!(us.aliases.contains(&"usa".to_string()));
    }

    #[test]
    fn test_hits_match_normalized_aliases() {
        let table = AliasTable::default();
        let hits: Vec<_> = table.hits("امريكا").map(|e| e.canonical.as_str()).collect();
        assert_eq!(hits, vec!["الولايات المتحدة"]);

        // "المملكه" only matches once taa marbuta is folded
        let hits: Vec<_> = table.hits("المملكه").map(|e| e.canonical.as_str()).collect();
        assert_eq!(hits, vec!["المملكة المتحدة"]);
    }

    #[test]
    fn test_from_json_str() {
        let table = AliasTable::from_json_str(
            r#"[{"canonical": "مصر", "aliases": ["Egypt", "مصر العربية"]}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.hits("egypt").count(), 1);
    }

    #[test]
    fn test_blank_canonical_is_rejected() {
        let result = AliasTable::from_json_str(r#"[{"canonical": "  ", "aliases": ["x"]}]"#);
        assert!(matches!(result, Err(CatalogError::AliasTable(_))));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = AliasTable::from_json_str(r#"{"United Kingdom": ["uk"]}"#);
        assert!(matches!(result, Err(CatalogError::Serialization(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"canonical": "الإمارات", "aliases": ["uae", "emirates"]}}]"#
        )
        .unwrap();

        let table = AliasTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.hits("الامارات").count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AliasTable::from_json_file("/definitely/not/here/aliases.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
