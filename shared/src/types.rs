//! Common types used across the inventory core

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The stock counter a movement or alert applies to.
///
/// Variant-level when `variant_id` is set, otherwise product-level. A
/// movement is keyed to exactly one target, never both levels at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockTarget {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
}

impl StockTarget {
    pub fn product(product_id: Uuid) -> Self {
        Self {
            product_id,
            variant_id: None,
        }
    }

    pub fn variant(product_id: Uuid, variant_id: Uuid) -> Self {
        Self {
            product_id,
            variant_id: Some(variant_id),
        }
    }

    pub fn is_variant(&self) -> bool {
        self.variant_id.is_some()
    }
}

impl fmt::Display for StockTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant_id {
            Some(variant_id) => write!(f, "variant {}", variant_id),
            None => write!(f, "product {}", self.product_id),
        }
    }
}
