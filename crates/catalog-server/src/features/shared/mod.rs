//! Shared utilities and types for feature modules
//!
//! This module contains reusable code to reduce duplication across feature implementations.
//!
//! # Contents
//!
//! - **pagination**: Common pagination types and helpers
//! - **validation**: Input validation utilities
//! - **error_helpers**: Database and ordering error handling utilities
//! - **sorting**: Fixed sort-key tables for list endpoints
//! - **search_filter**: SQL predicate for locale-aware search

pub mod error_helpers;
pub mod pagination;
pub mod search_filter;
pub mod sorting;
pub mod validation;

// Re-export commonly used types
pub use pagination::{Paginated, PaginationError, PaginationMetadata, PaginationParams};
pub use search_filter::push_search_condition;
pub use sorting::{order_by_clause, SortDirection, SortError, SortField, SortKeys};
pub use validation::{validate_name, validate_required_text, FieldValidationError, NameValidationError};
