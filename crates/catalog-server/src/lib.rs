//! Catalog Server Library
//!
//! REST API behind the visa and travel admin panel: orderable attributes
//! and countries, a user listing and public contact requests.
//!
//! # Overview
//!
//! - **Ordering**: Attributes and countries carry a unique display order.
//!   New rows go to the end; batch reorders are applied atomically by the
//!   [`ordering`] engine.
//! - **Search**: List endpoints accept free text that is normalized for
//!   Arabic (diacritics, letter variants) and expanded through an alias
//!   table, see [`catalog_common::search`].
//! - **Database**: PostgreSQL via SQLx, migrations bundled under
//!   `migrations/`.
//!
//! # Architecture
//!
//! Each resource is a vertical slice under [`features`] with `commands/`
//! for writes, `queries/` for reads and a `routes.rs` that maps handler
//! errors to HTTP responses.
//!
//! # Example
//!
//! ```no_run
//! use catalog_server::{api, config::Config, db, features::FeatureState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&(&config.database).into()).await?;
//!     let aliases = config.search.alias_table()?;
//!     let state = FeatureState::new(pool, aliases, config.ordering.max_batch);
//!     api::serve(state, &config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod ordering;

pub use error::AppError;
