//! PostgreSQL persistence for Slotbook: row types, schema creation, raw
//! repository queries and the [`BookingStore`] boundary the API depends on.

pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use store::{BookingStore, MockBookingStore, PgBookingStore};

pub type DbPool = Pool<Postgres>;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to PostgreSQL")?;

    Ok(pool)
}
