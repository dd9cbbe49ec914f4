//! Locale-aware search helpers
//!
//! Free-text queries against catalog listings must match regardless of how
//! an Arabic word was typed (hamza forms, taa marbuta, alef maqsura,
//! tashkeel) and must also find records stored under a well-known alias
//! ("أمريكا" finds "الولايات المتحدة").
//!
//! - [`normalize`] / [`search_key`]: canonical comparable form of a string
//! - [`AliasTable`]: immutable canonical-term → aliases table, built once at
//!   startup and passed around by reference
//! - [`expand_search_terms`]: query → [`SearchTerms`], matched with
//!   OR-semantics against every searchable field of a record
//!
//! The PostgreSQL function `catalog_search_key(text)` shipped in the
//! migrations mirrors [`search_key`] so listings can filter in SQL.

mod aliases;
mod normalize;
mod terms;

pub use aliases::{AliasEntry, AliasTable};
pub use normalize::{is_arabic_diacritic, normalize, search_key};
pub use terms::{expand_search_terms, SearchTerms};
