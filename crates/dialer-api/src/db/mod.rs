//! # CDR Store
//!
//! Call Detail Records are written by the telephony switch and read or
//! pruned by the dialer. The store is **optional**: without `DATABASE_URL`
//! the CDR routes answer `CDR store not configured`.
//!
//! Handlers see the store only through [`CdrStore`]; [`PgCdrStore`] is the
//! Postgres implementation.

pub mod cdr;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

pub use cdr::{CdrRecord, PgCdrStore};

/// CDR store failures.
#[derive(Error, Debug)]
pub enum CdrStoreError {
    /// No record carries the requested unique id.
    #[error("no rows in result set for unique id '{0}'")]
    NotFound(String),

    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Access to stored call records.
#[async_trait]
pub trait CdrStore: Send + Sync {
    /// Record with the switch-assigned unique id.
    async fn get_cdr(&self, unique_id: &str) -> Result<CdrRecord, CdrStoreError>;

    /// Delete the record with primary key `id`, returning the affected row count.
    async fn delete_cdr(&self, id: i64) -> Result<u64, CdrStoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<i64, CdrStoreError>;
}

/// Connect to Postgres and apply the embedded migrations.
///
/// Returns `None` when `url` is `None`.
pub async fn init_pool(url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = url else {
        tracing::warn!("DATABASE_URL not set; CDR routes are disabled");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;
    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
