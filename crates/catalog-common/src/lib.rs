//! Catalog Common Library
//!
//! Shared types, utilities, and error handling for the catalog administration
//! service.
//!
//! # Overview
//!
//! - **Error Handling**: Shared error and result types
//! - **Logging**: Centralized `tracing` bootstrap
//! - **Search**: Arabic-aware text normalization and alias expansion used by
//!   every listing that accepts free-text queries
//!
//! # Example
//!
//! ```no_run
//! use catalog_common::search::{expand_search_terms, AliasTable};
//!
//! let aliases = AliasTable::default();
//! let terms = expand_search_terms("أمريكا", &aliases);
//! assert!(terms.contains("الولايات المتحدة"));
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod search;

// Re-export commonly used types
pub use error::{CatalogError, Result};
