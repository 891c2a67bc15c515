//! Stock transition planning
//!
//! The reservation engine never computes a stock update inline; it asks
//! [`plan_stock_update`] for the transition and persists exactly what the
//! plan says. Keeping the arithmetic here makes the reservation guard and
//! the zero-floor clamp testable in isolation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// What an order operation does to stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    /// Tentative decrement when an order is placed.
    Reserve,
    /// Reversal of a reservation on cancellation or return.
    Release,
}

impl StockOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockOperation::Reserve => "reserve",
            StockOperation::Release => "release",
        }
    }

    /// Signed stock delta for a requested quantity.
    pub fn delta(&self, quantity: i32) -> i32 {
        match self {
            StockOperation::Reserve => -quantity,
            StockOperation::Release => quantity,
        }
    }
}

/// One order line handed to the reservation engine or availability checker.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub product_name: Option<String>,
}

/// The planned before/after state of one stock counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockTransition {
    pub previous_stock: i32,
    pub new_stock: i32,
    /// Signed delta, matching the quantity recorded on the movement.
    pub quantity_delta: i32,
}

/// Why a stock update cannot be planned for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StockPlanError {
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i32, requested: i32 },
    #[error("quantity must be a positive integer")]
    NonPositiveQuantity,
}

/// Floor a computed stock value at zero.
pub fn clamp_stock(value: i32) -> i32 {
    value.max(0)
}

/// Plan a reserve/release transition for one stock counter.
///
/// Reservations fail when the counter holds less than the requested
/// quantity; the caller leaves the counter untouched and records no
/// movement for that item. Releases always succeed. The resulting
/// `new_stock` is clamped at zero.
pub fn plan_stock_update(
    previous_stock: i32,
    quantity: i32,
    operation: StockOperation,
) -> Result<StockTransition, StockPlanError> {
    if quantity <= 0 {
        return Err(StockPlanError::NonPositiveQuantity);
    }

    if operation == StockOperation::Reserve && previous_stock < quantity {
        return Err(StockPlanError::InsufficientStock {
            available: previous_stock,
            requested: quantity,
        });
    }

    let quantity_delta = operation.delta(quantity);
    Ok(StockTransition {
        previous_stock,
        // Saturating: a release near i32::MAX must not wrap through the clamp.
        new_stock: clamp_stock(previous_stock.saturating_add(quantity_delta)),
        quantity_delta,
    })
}

/// Replay a movement history against a starting counter, clamping at zero
/// per step. Used to reconcile a counter against its ledger.
pub fn replay_quantities<I>(starting_stock: i32, quantities: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    quantities
        .into_iter()
        .fold(starting_stock, |stock, quantity| {
            clamp_stock(stock.saturating_add(quantity))
        })
}

/// Before/after snapshot of one updated stock counter, returned to the
/// order caller and fed into alert evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedStockItem {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub quantity_changed: i32,
}
