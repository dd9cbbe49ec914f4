//! Feature modules implementing the catalog administration API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes.
//!
//! # Features
//!
//! - **attributes**: Orderable attribute definitions (CRUD + reorder)
//! - **countries**: Orderable countries with attribute values (create, list, get, delete, reorder)
//! - **users**: Read-only user listing for the admin panel
//! - **contact_requests**: Public contact form submissions and their admin listing
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete, reorder)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared record types (if needed)
//!
//! Command and query handlers are plain async functions taking the pool
//! (and the ordering engine or alias table where they need one).

pub mod attributes;
pub mod contact_requests;
pub mod countries;
pub mod shared;
pub mod users;

use std::sync::Arc;

use axum::Router;
use catalog_common::search::AliasTable;
use sqlx::PgPool;

use crate::ordering::{OrderingEngine, PgOrderStore};

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool for database operations
    pub db: PgPool,
    /// Search alias table, loaded once at startup
    pub aliases: Arc<AliasTable>,
    /// Ordering engine for attributes and countries
    pub ordering: Arc<OrderingEngine<PgOrderStore>>,
}

impl FeatureState {
    pub fn new(db: PgPool, aliases: AliasTable, max_batch: usize) -> Self {
        let ordering = OrderingEngine::new(PgOrderStore::new(db.clone())).with_max_batch(max_batch);
        Self {
            db,
            aliases: Arc::new(aliases),
            ordering: Arc::new(ordering),
        }
    }
}

/// Creates the API router with all feature routes mounted
///
/// - `/attributes` - Attribute management and ordering
/// - `/countries` - Country management and ordering
/// - `/users` - User listing
/// - `/contact-requests` - Contact form submissions
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/attributes", attributes::attributes_routes())
        .nest("/countries", countries::countries_routes())
        .nest("/users", users::users_routes())
        .nest("/contact-requests", contact_requests::contact_requests_routes())
        .with_state(state)
}
