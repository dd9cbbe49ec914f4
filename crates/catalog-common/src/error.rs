//! Error types shared across the catalog crates

use thiserror::Error;

/// Result type alias for shared catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for non-HTTP catalog failures
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid alias table: {0}")]
    AliasTable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
