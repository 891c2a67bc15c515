//! Read-side queries over the movement ledger
//!
//! Per-target history with running aggregates, cross-entity movement
//! reports, and the operational alerts snapshot. Nothing here mutates
//! state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    rank_top_products, summarize_movements, total_value_flow, AlertThresholds, MovementSummary,
    TopProduct,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ledger::{InventoryMovement, MovementType};

/// Movements within 24 hours at or beyond these magnitudes are surfaced as
/// unusual.
const LARGE_INFLOW_QUANTITY: i32 = 100;
const LARGE_OUTFLOW_QUANTITY: i32 = -50;

/// How far ahead the expiring-stock scan looks.
const EXPIRY_WINDOW_DAYS: i32 = 30;

/// Reporting service over the ledger and catalog projections
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
    thresholds: AlertThresholds,
}

/// Filter and pagination options for a per-target history query
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub limit: i64,
    pub offset: i64,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub movement_types: Option<Vec<MovementType>>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            date_from: None,
            date_to: None,
            movement_types: None,
        }
    }
}

/// Paginated history plus a full-window aggregate
#[derive(Debug, Clone, Serialize)]
pub struct MovementHistory {
    pub movements: Vec<InventoryMovement>,
    pub total: i64,
    pub summary: MovementSummary,
}

/// Filters for a cross-entity movement report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub product_ids: Option<Vec<Uuid>>,
    pub movement_types: Option<Vec<MovementType>>,
    pub user_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

/// Aggregate section of a movement report
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_movements: i64,
    pub total_value_in: rust_decimal::Decimal,
    pub total_value_out: rust_decimal::Decimal,
    pub net_value: rust_decimal::Decimal,
    pub top_products: Vec<TopProduct>,
}

/// Cross-entity movement report
#[derive(Debug, Clone, Serialize)]
pub struct MovementReport {
    pub summary: ReportSummary,
    pub movements: Vec<InventoryMovement>,
}

/// A product at or below its own reorder threshold
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LowStockProduct {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
    pub min_stock: i32,
}

/// A variant at or below the shared low-stock threshold
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LowStockVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub stock: i32,
}

/// Low-stock portion of the alerts snapshot
#[derive(Debug, Clone, Serialize)]
pub struct LowStockSnapshot {
    pub products: Vec<LowStockProduct>,
    pub variants: Vec<LowStockVariant>,
}

/// Operational alerts derived by scanning, independent of recent batches
#[derive(Debug, Clone, Serialize)]
pub struct AlertsSnapshot {
    pub low_stock: LowStockSnapshot,
    pub unusual_movements: Vec<InventoryMovement>,
    pub expiring_soon: Vec<InventoryMovement>,
}

const MOVEMENT_COLUMNS: &str = r#"
    id, product_id, variant_id, movement_type, quantity, previous_stock, new_stock,
    unit_cost, total_value, reason, reference, order_id, user_id, supplier_id,
    notes, batch_number, expiration_date, location_from, location_to, created_at
"#;

impl ReportingService {
    pub fn new(db: PgPool, thresholds: AlertThresholds) -> Self {
        Self { db, thresholds }
    }

    /// Movement history for one stock target: a paginated page plus a
    /// summary over the whole filter window.
    ///
    /// When `variant_id` is absent the history covers every movement of the
    /// product, variant-level included.
    pub async fn history(
        &self,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        query: &HistoryQuery,
    ) -> AppResult<MovementHistory> {
        let type_names = type_names(query.movement_types.as_deref());

        let filter = r#"
            WHERE product_id = $1
              AND ($2::uuid IS NULL OR variant_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at <= $4)
              AND ($5::text[] IS NULL OR movement_type::text = ANY($5))
        "#;

        let movements = sqlx::query_as::<_, InventoryMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM inventory_movements {filter}
             ORDER BY created_at DESC LIMIT $6 OFFSET $7"
        ))
        .bind(product_id)
        .bind(variant_id)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(&type_names)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM inventory_movements {filter}"
        ))
        .bind(product_id)
        .bind(variant_id)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(&type_names)
        .fetch_one(&self.db)
        .await?;

        // The summary runs over the full window, not the page.
        let quantities = sqlx::query_as::<_, (i32, Option<rust_decimal::Decimal>)>(&format!(
            "SELECT quantity, total_value FROM inventory_movements {filter}"
        ))
        .bind(product_id)
        .bind(variant_id)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(&type_names)
        .fetch_all(&self.db)
        .await?;

        Ok(MovementHistory {
            movements,
            total,
            summary: summarize_movements(quantities),
        })
    }

    /// Cross-entity movement report over a filter window.
    pub async fn report(&self, filter: &ReportFilter) -> AppResult<MovementReport> {
        let type_names = type_names(filter.movement_types.as_deref());

        let movements = sqlx::query_as::<_, InventoryMovement>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS} FROM inventory_movements
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at <= $2)
              AND ($3::uuid[] IS NULL OR product_id = ANY($3))
              AND ($4::text[] IS NULL OR movement_type::text = ANY($4))
              AND ($5::uuid IS NULL OR user_id = $5)
              AND ($6::uuid IS NULL OR supplier_id = $6)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(&filter.product_ids)
        .bind(&type_names)
        .bind(filter.user_id)
        .bind(filter.supplier_id)
        .fetch_all(&self.db)
        .await?;

        let flow = total_value_flow(movements.iter().map(|m| (m.quantity, m.total_value)));
        let mut top_products =
            rank_top_products(movements.iter().map(|m| (m.product_id, m.quantity)), 10);
        self.fill_product_names(&mut top_products).await?;

        Ok(MovementReport {
            summary: ReportSummary {
                total_movements: movements.len() as i64,
                total_value_in: flow.total_value_in,
                total_value_out: flow.total_value_out,
                net_value: flow.net_value,
                top_products,
            },
            movements,
        })
    }

    /// Operational alerts snapshot: low stock against per-product reorder
    /// thresholds, unusually large movements in the last 24 hours, and
    /// batches expiring within the next month that still hold stock.
    pub async fn alerts_snapshot(&self) -> AppResult<AlertsSnapshot> {
        let products = sqlx::query_as::<_, LowStockProduct>(
            r#"
            SELECT id, name, stock, min_stock
            FROM products
            WHERE stock <= min_stock
            ORDER BY stock ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let variants = sqlx::query_as::<_, LowStockVariant>(
            r#"
            SELECT v.id, v.product_id, p.name AS product_name, v.sku, v.stock
            FROM product_variants v
            JOIN products p ON p.id = v.product_id
            WHERE v.stock <= $1
            ORDER BY v.stock ASC
            "#,
        )
        .bind(self.thresholds.low_stock)
        .fetch_all(&self.db)
        .await?;

        let unusual_movements = sqlx::query_as::<_, InventoryMovement>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS} FROM inventory_movements
            WHERE created_at >= now() - interval '24 hours'
              AND (quantity >= $1 OR quantity <= $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(LARGE_INFLOW_QUANTITY)
        .bind(LARGE_OUTFLOW_QUANTITY)
        .fetch_all(&self.db)
        .await?;

        let expiring_soon = sqlx::query_as::<_, InventoryMovement>(&format!(
            r#"
            SELECT DISTINCT ON (product_id, batch_number) {MOVEMENT_COLUMNS}
            FROM inventory_movements
            WHERE expiration_date >= now()
              AND expiration_date <= now() + make_interval(days => $1)
              AND new_stock > 0
            ORDER BY product_id, batch_number, created_at DESC
            "#
        ))
        .bind(EXPIRY_WINDOW_DAYS)
        .fetch_all(&self.db)
        .await?;

        Ok(AlertsSnapshot {
            low_stock: LowStockSnapshot { products, variants },
            unusual_movements,
            expiring_soon,
        })
    }

    async fn fill_product_names(&self, top_products: &mut [TopProduct]) -> AppResult<()> {
        if top_products.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = top_products.iter().map(|p| p.product_id).collect();
        let names: HashMap<Uuid, String> =
            sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM products WHERE id = ANY($1)")
                .bind(&ids)
                .fetch_all(&self.db)
                .await?
                .into_iter()
                .collect();

        for product in top_products.iter_mut() {
            product.product_name = names.get(&product.product_id).cloned();
        }

        Ok(())
    }
}

fn type_names(types: Option<&[MovementType]>) -> Option<Vec<String>> {
    types.map(|types| types.iter().map(|t| t.as_str().to_string()).collect())
}
