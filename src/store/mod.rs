use std::sync::OnceLock;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config;

pub mod categories;
pub mod invoices;
pub mod models;
pub mod orders;
pub mod products;
pub mod users;
pub mod variantes;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Process-wide connection pool handle. Connection pooling is legitimately
/// global; everything else is passed around explicitly.
pub struct Store;

impl Store {
    /// Get the shared pool, creating it lazily from DATABASE_URL on first
    /// use. No connection is established until a query runs.
    pub fn pool() -> Result<&'static PgPool, StoreError> {
        if let Some(pool) = POOL.get() {
            return Ok(pool);
        }

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.acquire_timeout_secs))
            .connect_lazy(&url)?;

        // A concurrent first caller may have won the race; its pool is kept
        // and this one is dropped.
        Ok(POOL.get_or_init(|| pool))
    }

    /// Connect for real and bring the schema up to date. Called once at
    /// startup.
    pub async fn init() -> Result<(), StoreError> {
        let pool = Self::pool()?;
        sqlx::migrate!().run(pool).await?;
        info!("store initialized, schema is current");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool()?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool (e.g. on shutdown)
    pub async fn close() {
        if let Some(pool) = POOL.get() {
            pool.close().await;
            info!("closed store connection pool");
        }
    }
}
