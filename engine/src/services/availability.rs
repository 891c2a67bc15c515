//! Stock availability pre-flight check
//!
//! Pure read, no locking: a result is advisory and can be stale by the
//! time the reservation executes. The reservation engine re-validates
//! every line under a row lock.

use serde::Serialize;
use shared::{OrderItem, StockTarget};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::catalog::CatalogStore;

/// Availability checker over the catalog stock counters
#[derive(Clone)]
pub struct AvailabilityService {
    catalog: CatalogStore,
}

/// One order line that cannot be satisfied at current stock levels
#[derive(Debug, Clone, Serialize)]
pub struct InsufficientItem {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub requested: i32,
    pub available: i32,
}

/// Result of an availability check
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub available: bool,
    pub insufficient_items: Vec<InsufficientItem>,
}

impl AvailabilityService {
    pub fn new(db: PgPool) -> Self {
        Self {
            catalog: CatalogStore::new(db),
        }
    }

    /// Report which requested lines exceed current stock. Unknown targets
    /// count as zero available.
    pub async fn check(&self, items: &[OrderItem]) -> AppResult<AvailabilityReport> {
        let mut insufficient_items = Vec::new();

        for item in items {
            let target = StockTarget {
                product_id: item.product_id,
                variant_id: item.variant_id,
            };

            let (available, product_name) = match self.catalog.get_stock(&target).await? {
                Some(record) => (record.stock, Some(record.name)),
                None => (0, item.product_name.clone()),
            };

            if available < item.quantity {
                insufficient_items.push(InsufficientItem {
                    product_id: item.product_id,
                    variant_id: item.variant_id,
                    product_name,
                    requested: item.quantity,
                    available,
                });
            }
        }

        Ok(AvailabilityReport {
            available: insufficient_items.is_empty(),
            insufficient_items,
        })
    }
}
