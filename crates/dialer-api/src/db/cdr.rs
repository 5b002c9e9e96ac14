//! Postgres-backed CDR store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{CdrStore, CdrStoreError};

/// One call detail record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CdrRecord {
    pub id: i64,
    pub calldate: DateTime<Utc>,
    pub clid: String,
    pub src: String,
    pub dst: String,
    pub dcontext: String,
    pub channel: String,
    pub dstchannel: String,
    pub lastapp: String,
    pub lastdata: String,
    pub duration: i32,
    pub billsec: i32,
    pub disposition: String,
    pub uniqueid: String,
    pub userfield: String,
}

/// [`CdrStore`] over a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgCdrStore {
    pool: PgPool,
}

impl PgCdrStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CdrStore for PgCdrStore {
    async fn get_cdr(&self, unique_id: &str) -> Result<CdrRecord, CdrStoreError> {
        sqlx::query_as::<_, CdrRecord>(
            "SELECT id, calldate, clid, src, dst, dcontext, channel, dstchannel,
             lastapp, lastdata, duration, billsec, disposition, uniqueid, userfield
             FROM cdr WHERE uniqueid = $1 LIMIT 1",
        )
        .bind(unique_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CdrStoreError::NotFound(unique_id.to_string()))
    }

    async fn delete_cdr(&self, id: i64) -> Result<u64, CdrStoreError> {
        let result = sqlx::query("DELETE FROM cdr WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, CdrStoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cdr")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
