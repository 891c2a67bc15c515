//! Adapter over the catalog store's stock counters
//!
//! Products and variants are owned by the catalog elsewhere in the
//! platform; this core only ever reads and mutates their `stock` field.
//! Mutations run on a caller-supplied connection so they co-commit with
//! the ledger append in the same transaction.

use shared::StockTarget;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};

/// Read/write access to the current-stock counters.
#[derive(Clone)]
pub struct CatalogStore {
    db: PgPool,
}

/// Snapshot of one stock counter.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockRecord {
    pub stock: i32,
    /// Product display name, used in caller-facing error messages.
    pub name: String,
    /// Only products carry their own reorder threshold; variants fall back
    /// to the shared alert policy.
    pub min_stock: Option<i32>,
}

impl CatalogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Unlocked read of a stock counter. Advisory only; the value can be
    /// stale by the time a reservation executes.
    pub async fn get_stock(&self, target: &StockTarget) -> AppResult<Option<StockRecord>> {
        let record = match target.variant_id {
            Some(variant_id) => {
                sqlx::query_as::<_, StockRecord>(
                    r#"
                    SELECT v.stock, p.name, NULL::integer AS min_stock
                    FROM product_variants v
                    JOIN products p ON p.id = v.product_id
                    WHERE v.id = $1
                    "#,
                )
                .bind(variant_id)
                .fetch_optional(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, StockRecord>(
                    "SELECT stock, name, min_stock FROM products WHERE id = $1",
                )
                .bind(target.product_id)
                .fetch_optional(&self.db)
                .await?
            }
        };

        Ok(record)
    }

    /// Read a stock counter with a row lock held for the rest of the
    /// caller's transaction. This serializes concurrent read-check-write
    /// cycles on the same target.
    pub async fn lock_stock(
        &self,
        conn: &mut PgConnection,
        target: &StockTarget,
    ) -> AppResult<Option<StockRecord>> {
        let record = match target.variant_id {
            Some(variant_id) => {
                sqlx::query_as::<_, StockRecord>(
                    r#"
                    SELECT v.stock, p.name, NULL::integer AS min_stock
                    FROM product_variants v
                    JOIN products p ON p.id = v.product_id
                    WHERE v.id = $1
                    FOR UPDATE OF v
                    "#,
                )
                .bind(variant_id)
                .fetch_optional(&mut *conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, StockRecord>(
                    "SELECT stock, name, min_stock FROM products WHERE id = $1 FOR UPDATE",
                )
                .bind(target.product_id)
                .fetch_optional(&mut *conn)
                .await?
            }
        };

        Ok(record)
    }

    /// Persist a new counter value on the locked row.
    pub async fn set_stock(
        &self,
        conn: &mut PgConnection,
        target: &StockTarget,
        new_stock: i32,
    ) -> AppResult<()> {
        let result = match target.variant_id {
            Some(variant_id) => {
                sqlx::query("UPDATE product_variants SET stock = $1 WHERE id = $2")
                    .bind(new_stock)
                    .bind(variant_id)
                    .execute(&mut *conn)
                    .await?
            }
            None => {
                sqlx::query("UPDATE products SET stock = $1 WHERE id = $2")
                    .bind(new_stock)
                    .bind(target.product_id)
                    .execute(&mut *conn)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(target.to_string()));
        }

        Ok(())
    }
}
