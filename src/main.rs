use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use slotkeeper_api::{config::ApiConfig, init_tracing};
use slotkeeper_core::{AvailabilityEngine, Stores};
use slotkeeper_db::{create_pool, schema::initialize_database, MemoryStore, PgStore};
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_level)?;

    let (stores, storage) = match &config.database_url {
        Some(database_url) => {
            let db_pool = create_pool(database_url)
                .await
                .wrap_err("Failed to connect to DATABASE_URL")?;
            initialize_database(&db_pool).await?;
            (Stores::shared(Arc::new(PgStore::new(db_pool))), "postgres")
        }
        None => {
            warn!("DATABASE_URL is not set, schedules are kept in memory and lost on restart");
            (Stores::shared(Arc::new(MemoryStore::new())), "memory")
        }
    };

    let engine = AvailabilityEngine::new(stores, config.engine.clone());

    // Start API server
    slotkeeper_api::start_server(config, engine, storage).await?;

    Ok(())
}
