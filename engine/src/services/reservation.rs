//! Stock reservation engine
//!
//! Orchestrates reserve/release for a batch of order lines. Items are
//! processed in input order; each line runs in its own transaction that
//! locks the stock row, re-validates availability, writes the new counter,
//! and co-appends the ledger movement. A failed line is recorded as a
//! per-item error and does not roll back its siblings, so compensation for
//! a partially reserved order is the caller's responsibility.

use chrono::Utc;
use serde::Serialize;
use shared::{
    plan_stock_update, OrderItem, StockOperation, StockPlanError, StockTarget, UpdatedStockItem,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::services::catalog::CatalogStore;
use crate::services::ledger::{LedgerService, MovementType, NewMovement};

/// Reservation engine over the catalog store and movement ledger
#[derive(Clone)]
pub struct ReservationService {
    db: PgPool,
    catalog: CatalogStore,
    ledger: LedgerService,
}

/// Caller attribution for the movements written by an order operation
#[derive(Debug, Clone, Default)]
pub struct OrderContext {
    pub order_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    /// Correlation id stamped on every movement of the batch. A synthetic
    /// `ORDER_<millis>` reference is generated when absent.
    pub reference: Option<String>,
}

/// Outcome of a reserve/release batch
#[derive(Debug, Clone, Serialize)]
pub struct StockUpdateReport {
    pub success: bool,
    pub errors: Vec<String>,
    pub updated_items: Vec<UpdatedStockItem>,
}

impl ReservationService {
    pub fn new(db: PgPool) -> Self {
        Self {
            catalog: CatalogStore::new(db.clone()),
            ledger: LedgerService::new(db.clone()),
            db,
        }
    }

    /// Reserve or release stock for the items of an order.
    ///
    /// Per-item problems (unknown target, insufficient stock) are collected
    /// into `errors` and the batch continues; database failures abort the
    /// whole call.
    pub async fn update_stock_for_order(
        &self,
        items: &[OrderItem],
        operation: StockOperation,
        ctx: &OrderContext,
    ) -> AppResult<StockUpdateReport> {
        let mut errors = Vec::new();
        let mut updated_items = Vec::new();

        let reference = ctx
            .reference
            .clone()
            .unwrap_or_else(|| format!("ORDER_{}", Utc::now().timestamp_millis()));

        for item in items {
            let target = StockTarget {
                product_id: item.product_id,
                variant_id: item.variant_id,
            };

            // Reject malformed lines before opening a transaction.
            if item.validate().is_err() {
                errors.push(format!(
                    "invalid quantity {} for {}",
                    item.quantity, target
                ));
                continue;
            }

            let mut tx = self.db.begin().await?;

            // Row lock held until commit: the read-check-write below is
            // serialized against concurrent operations on the same target.
            let Some(record) = self.catalog.lock_stock(&mut tx, &target).await? else {
                errors.push(format!("{} not found", target));
                continue;
            };

            let display_name = item.product_name.as_deref().unwrap_or(&record.name);

            let transition = match plan_stock_update(record.stock, item.quantity, operation) {
                Ok(transition) => transition,
                Err(StockPlanError::InsufficientStock {
                    available,
                    requested,
                }) => {
                    tracing::warn!(
                        target = %target,
                        available,
                        requested,
                        "reservation rejected for insufficient stock"
                    );
                    errors.push(format!(
                        "insufficient stock for {}: available {}, requested {}",
                        display_name, available, requested
                    ));
                    continue;
                }
                Err(StockPlanError::NonPositiveQuantity) => {
                    errors.push(format!(
                        "invalid quantity {} for {}",
                        item.quantity, display_name
                    ));
                    continue;
                }
            };

            self.catalog
                .set_stock(&mut tx, &target, transition.new_stock)
                .await?;

            let (movement_type, reason, verb) = match operation {
                StockOperation::Reserve => (
                    MovementType::Reservation,
                    "Reserved for order",
                    "Reserved",
                ),
                StockOperation::Release => (
                    MovementType::Release,
                    "Released after cancellation or return",
                    "Released",
                ),
            };

            self.ledger
                .record_in(
                    &mut tx,
                    &NewMovement {
                        product_id: item.product_id,
                        variant_id: item.variant_id,
                        movement_type,
                        quantity: transition.quantity_delta,
                        previous_stock: transition.previous_stock,
                        new_stock: transition.new_stock,
                        unit_cost: None,
                        total_value: None,
                        reason: reason.to_string(),
                        reference: Some(reference.clone()),
                        order_id: ctx.order_id,
                        user_id: ctx.user_id,
                        supplier_id: None,
                        notes: Some(format!("{} for {}", verb, display_name)),
                        batch_number: None,
                        expiration_date: None,
                        location_from: None,
                        location_to: None,
                    },
                )
                .await?;

            tx.commit().await?;

            updated_items.push(UpdatedStockItem {
                product_id: item.product_id,
                variant_id: item.variant_id,
                previous_stock: transition.previous_stock,
                new_stock: transition.new_stock,
                quantity_changed: transition.quantity_delta,
            });
        }

        Ok(StockUpdateReport {
            success: errors.is_empty(),
            errors,
            updated_items,
        })
    }
}
