//! Catalog Server - Main entry point

use anyhow::Result;
use catalog_common::logging::{init_logging, LogConfig};
use tracing::info;

use catalog_server::{
    api,
    config::Config,
    db::{self, DbConfig},
    features::FeatureState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig {
        log_file_prefix: "catalog-server".to_string(),
        filter_directives: Some("catalog_server=debug,tower_http=debug,sqlx=info".to_string()),
        ..LogConfig::default()
    }
    .merge_env()?;

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(&log_config)?;

    info!("Starting Catalog Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&DbConfig::from(&config.database)).await?;
    db::migrate(&pool).await?;

    let aliases = config.search.alias_table()?;
    info!(entries = aliases.len(), "Search alias table loaded");

    let state = FeatureState::new(pool, aliases, config.ordering.max_batch);
    api::serve(state, &config).await
}
