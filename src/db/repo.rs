//! SQLite-backed price cache.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::pricing::{PriceCache, PriceCacheError};

/// Repository over the `prices` table.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Upsert many prices in a single transaction. Returns the number of rows written.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub async fn upsert_prices_batch(&self, prices: &[(String, i64)]) -> Result<usize, sqlx::Error> {
        if prices.is_empty() {
            return Ok(0);
        }

        let updated_at = chrono::Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;

        for (key, price_cents) in prices {
            sqlx::query(
                r#"
                INSERT INTO prices (key, price_cents, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                    price_cents = excluded.price_cents,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key.as_str())
            .bind(*price_cents)
            .bind(updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(prices.len())
    }
}

#[async_trait]
impl PriceCache for Repository {
    async fn get(&self, key: &str) -> Result<Option<i64>, PriceCacheError> {
        let row = sqlx::query("SELECT price_cents FROM prices WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<i64, _>("price_cents")))
    }

    async fn set(&self, key: &str, price_cents: i64) -> Result<(), PriceCacheError> {
        self.upsert_prices_batch(&[(key.to_string(), price_cents)])
            .await?;
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool, PriceCacheError> {
        let row = sqlx::query("SELECT 1 FROM prices WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn size(&self) -> Result<usize, PriceCacheError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM prices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    /// Every `set` commits on its own, so there is nothing to flush.
    async fn flush(&self) -> Result<(), PriceCacheError> {
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, i64)>, PriceCacheError> {
        let rows = sqlx::query("SELECT key, price_cents FROM prices ORDER BY key ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.get::<String, _>("key"), r.get::<i64, _>("price_cents")))
            .collect())
    }
}
