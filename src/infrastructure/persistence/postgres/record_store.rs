//! # PostgreSQL Record Store
//!
//! PostgreSQL implementation of [`RecordStore`] using sqlx.
//!
//! Each record type gets a document table named after [`Record::TABLE`]:
//!
//! ```sql
//! CREATE TABLE wallets_wallet (
//!     id           UUID PRIMARY KEY,
//!     owner_id     UUID,
//!     is_exclusive BOOLEAN NOT NULL DEFAULT FALSE,
//!     listed_at    TIMESTAMPTZ NOT NULL,
//!     body         JSONB NOT NULL
//! );
//! CREATE TABLE wallets_wallet_keys (
//!     natural_key TEXT PRIMARY KEY,
//!     record_id   UUID NOT NULL REFERENCES wallets_wallet (id) ON DELETE CASCADE
//! );
//! ```
//!
//! A save runs in one transaction: siblings sharing the owner lose the
//! exclusive flag (`jsonb_set` on the body), the row is upserted, and its
//! natural keys are replaced. A unique violation on the keys table rolls
//! the transaction back and surfaces as [`RepositoryError::Duplicate`].

use crate::domain::entities::Record;
use crate::infrastructure::persistence::traits::{
    RecordStore, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL implementation of [`RecordStore`].
///
/// Uses connection pooling via `sqlx::PgPool`.
pub struct PostgresStore<T> {
    pool: PgPool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> PostgresStore<T> {
    /// Creates a new store over `pool`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the record and key tables if missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Query` if a statement fails.
    pub async fn migrate(pool: &PgPool) -> RepositoryResult<()> {
        let table = T::TABLE;
        let statements = [
            format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id UUID PRIMARY KEY,
                    owner_id UUID,
                    is_exclusive BOOLEAN NOT NULL DEFAULT FALSE,
                    listed_at TIMESTAMPTZ NOT NULL,
                    body JSONB NOT NULL
                )"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {table}_listed_at_idx ON {table} (listed_at DESC)"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {table}_owner_idx ON {table} (owner_id) WHERE is_exclusive"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {table}_keys (
                    natural_key TEXT PRIMARY KEY,
                    record_id UUID NOT NULL REFERENCES {table} (id) ON DELETE CASCADE
                )"
            ),
        ];

        for statement in &statements {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;
        }
        debug!(table, "record tables ready");
        Ok(())
    }

    fn decode(row: RecordRow) -> RepositoryResult<T> {
        serde_json::from_value(row.body).map_err(|e| RepositoryError::serialization(e.to_string()))
    }
}

impl<T> Clone for PostgresStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> fmt::Debug for PostgresStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("table", &T::TABLE)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for PostgresStore<T> {
    async fn save(&self, mut record: T) -> RepositoryResult<T> {
        record.prepare(Utc::now());
        let table = T::TABLE;
        let id = record.id();
        let listed_at: DateTime<Utc> = record.listed_at();
        let flag = record.exclusive_flag();
        let body = serde_json::to_value(&record)
            .map_err(|e| RepositoryError::serialization(e.to_string()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;

        if let (Some(flag), Some(field)) = (flag, T::EXCLUSIVE_FIELD)
            && flag.set
        {
            // Flagged saves of one owner run one at a time until commit.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                .bind(format!("{table}:{}", flag.owner))
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

            sqlx::query(&format!(
                "UPDATE {table}
                 SET is_exclusive = FALSE,
                     body = jsonb_set(body, ARRAY[$3::text], 'false'::jsonb)
                 WHERE owner_id = $1 AND is_exclusive AND id <> $2"
            ))
            .bind(flag.owner)
            .bind(id)
            .bind(field)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        }

        sqlx::query(&format!(
            "INSERT INTO {table} (id, owner_id, is_exclusive, listed_at, body)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                 owner_id = EXCLUDED.owner_id,
                 is_exclusive = EXCLUDED.is_exclusive,
                 listed_at = EXCLUDED.listed_at,
                 body = EXCLUDED.body"
        ))
        .bind(id)
        .bind(flag.map(|f| f.owner))
        .bind(flag.is_some_and(|f| f.set))
        .bind(listed_at)
        .bind(&body)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        sqlx::query(&format!("DELETE FROM {table}_keys WHERE record_id = $1"))
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        for natural_key in record.natural_keys() {
            sqlx::query(&format!(
                "INSERT INTO {table}_keys (natural_key, record_id) VALUES ($1, $2)"
            ))
            .bind(&natural_key)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::duplicate(table, natural_key.clone())
                }
                other => RepositoryError::query(other.to_string()),
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> RepositoryResult<Option<T>> {
        let row: Option<RecordRow> =
            sqlx::query_as(&format!("SELECT body FROM {} WHERE id = $1", T::TABLE))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(Self::decode).transpose()
    }

    async fn list(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<T>> {
        let offset = i64::try_from(offset).map_err(|e| RepositoryError::query(e.to_string()))?;
        let limit = i64::try_from(limit).map_err(|e| RepositoryError::query(e.to_string()))?;

        let rows: Vec<RecordRow> = sqlx::query_as(&format!(
            "SELECT body FROM {} ORDER BY listed_at DESC, id ASC LIMIT $1 OFFSET $2",
            T::TABLE
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(Self::decode).collect()
    }

    async fn all(&self) -> RepositoryResult<Vec<T>> {
        let rows: Vec<RecordRow> = sqlx::query_as(&format!(
            "SELECT body FROM {} ORDER BY listed_at DESC, id ASC",
            T::TABLE
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        rows.into_iter().map(Self::decode).collect()
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", T::TABLE))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        u64::try_from(count).map_err(|e| RepositoryError::internal(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::TABLE))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Row type for document queries.
#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    body: serde_json::Value,
}
