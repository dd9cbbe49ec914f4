use super::aliases::AliasTable;
use super::normalize::{normalize, search_key};

/// The expanded, de-duplicated terms a listing filter matches against
///
/// The literal query is always first, followed by its normalized form
/// when that differs, followed by every canonical term and alias (each
/// also in normalized form) of the alias entries the query hits. Matching
/// is OR across terms and across fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    terms: Vec<String>,
}

impl SearchTerms {
    fn push(&mut self, term: &str) {
        if !term.is_empty() && !self.contains(term) {
            self.terms.push(term.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// The terms exactly as expanded (case preserved), for the
    /// case-insensitive literal match path
    pub fn raw_terms(&self) -> Vec<String> {
        self.terms.clone()
    }

    /// Search keys of every term, de-duplicated; these are what gets
    /// compared against `search_key(field)` / `catalog_search_key(column)`
    pub fn search_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.terms.len());
        for key in self.terms.iter().map(|t| search_key(t)) {
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Whether any of `fields` matches any term
    ///
    /// A field matches when its search key contains a term's search key, or
    /// when its lowercased text contains the lowercased raw term. An empty
    /// term set matches nothing.
    pub fn matches<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.is_empty() {
            return false;
        }

        let keys = self.search_keys();
        let raw: Vec<String> = self.terms.iter().map(|t| t.to_lowercase()).collect();

        fields.into_iter().any(|field| {
            let field_key = search_key(field);
            let field_lower = field.to_lowercase();
            keys.iter().any(|k| field_key.contains(k.as_str()))
                || raw.iter().any(|r| field_lower.contains(r.as_str()))
        })
    }
}

impl<'a> IntoIterator for &'a SearchTerms {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

/// Expand a free-text query into every spelling that should match it
///
/// Surrounding whitespace is ignored; a blank query expands to an empty set
/// so callers can skip the filter entirely.
///
/// ```
/// use catalog_common::search::{expand_search_terms, AliasTable};
///
/// let terms = expand_search_terms("أمريكا", &AliasTable::default());
/// assert_eq!(terms.iter().next(), Some("أمريكا"));
/// assert!(terms.contains("امريكا"));
/// assert!(terms.contains("الولايات المتحدة"));
/// ```
#[tracing::instrument(level = "trace", skip(aliases))]
pub fn expand_search_terms(query: &str, aliases: &AliasTable) -> SearchTerms {
    let mut terms = SearchTerms::default();
    let query = query.trim();
    if query.is_empty() {
        return terms;
    }

    terms.push(query);
    terms.push(&normalize(query));
    let query_key = search_key(query);
    terms.push(&query_key);

    for entry in aliases.hits(&query_key) {
        for term in std::iter::once(&entry.canonical).chain(&entry.aliases) {
            terms.push(term);
            terms.push(&normalize(term));
        }
    }

    tracing::trace!(count = terms.len(), "Expanded search terms");
    terms
}
