//! Ledger summary math
//!
//! Aggregations over movement quantities and values. The reporting service
//! fetches the raw `(quantity, total_value)` pairs for a filter window and
//! folds them through these functions, so the same arithmetic is exercised
//! by unit tests without a database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate over all movements of one stock target within a filter window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementSummary {
    /// Sum of positive quantities.
    pub total_in: i64,
    /// Absolute sum of negative quantities.
    pub total_out: i64,
    pub net_movement: i64,
    /// Value-weighted average unit cost over incoming movements that carry
    /// a total value. `None` when no such movement exists.
    pub average_cost: Option<Decimal>,
}

/// Fold `(quantity, total_value)` pairs into a [`MovementSummary`].
pub fn summarize_movements<I>(movements: I) -> MovementSummary
where
    I: IntoIterator<Item = (i32, Option<Decimal>)>,
{
    let mut total_in: i64 = 0;
    let mut total_out: i64 = 0;
    let mut valued_quantity: i64 = 0;
    let mut valued_total = Decimal::ZERO;

    for (quantity, total_value) in movements {
        if quantity > 0 {
            total_in += i64::from(quantity);
            if let Some(value) = total_value {
                valued_quantity += i64::from(quantity);
                valued_total += value;
            }
        } else {
            total_out += i64::from(quantity.unsigned_abs());
        }
    }

    let average_cost = if valued_quantity > 0 {
        Some(valued_total / Decimal::from(valued_quantity))
    } else {
        None
    };

    MovementSummary {
        total_in,
        total_out,
        net_movement: total_in - total_out,
        average_cost,
    }
}

/// Monetary in/out flow over a set of movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFlow {
    pub total_value_in: Decimal,
    pub total_value_out: Decimal,
    pub net_value: Decimal,
}

/// Sum movement values by direction; movements without a value are skipped.
pub fn total_value_flow<I>(movements: I) -> ValueFlow
where
    I: IntoIterator<Item = (i32, Option<Decimal>)>,
{
    let mut total_value_in = Decimal::ZERO;
    let mut total_value_out = Decimal::ZERO;

    for (quantity, total_value) in movements {
        let Some(value) = total_value else { continue };
        if quantity > 0 {
            total_value_in += value;
        } else if quantity < 0 {
            total_value_out += value.abs();
        }
    }

    ValueFlow {
        total_value_in,
        total_value_out,
        net_value: total_value_in - total_value_out,
    }
}

/// One entry of the top-moved-products ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_id: Uuid,
    /// Resolved from the catalog by the caller; ranking itself does not
    /// need it.
    pub product_name: Option<String>,
    pub total_movements: i64,
    pub net_quantity: i64,
}

/// Rank products by movement count, then by net quantity, capped at `limit`.
pub fn rank_top_products<I>(movements: I, limit: usize) -> Vec<TopProduct>
where
    I: IntoIterator<Item = (Uuid, i32)>,
{
    let mut by_product: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for (product_id, quantity) in movements {
        let entry = by_product.entry(product_id).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += i64::from(quantity);
    }

    let mut ranking: Vec<TopProduct> = by_product
        .into_iter()
        .map(|(product_id, (total_movements, net_quantity))| TopProduct {
            product_id,
            product_name: None,
            total_movements,
            net_quantity,
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.total_movements
            .cmp(&a.total_movements)
            .then(b.net_quantity.cmp(&a.net_quantity))
            .then(a.product_id.cmp(&b.product_id))
    });
    ranking.truncate(limit);
    ranking
}
