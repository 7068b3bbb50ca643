use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use slotbook_api::config::ApiConfig;
use slotbook_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env().wrap_err("Invalid server configuration")?;
    let db_pool = create_pool(&config.database_url).await?;

    // Idempotent, safe on every start
    initialize_database(&db_pool)
        .await
        .wrap_err("Failed to create booking tables")?;

    slotbook_api::start_server(config, db_pool).await
}
