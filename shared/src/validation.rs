//! Validation rules for ledger inputs
//!
//! Every movement append runs through these checks before anything touches
//! storage; a failed check means no partial record is written.

use rust_decimal::Decimal;
use uuid::Uuid;

/// A movement quantity must be a non-zero signed integer. Positive
/// quantities increase stock, negative quantities decrease it.
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity == 0 {
        return Err("quantity must be a non-zero integer");
    }
    Ok(())
}

/// A movement must reference a real product; the nil UUID is the
/// "missing id" sentinel on deserialized input.
pub fn validate_product_id(product_id: Uuid) -> Result<(), &'static str> {
    if product_id.is_nil() {
        return Err("product id is required");
    }
    Ok(())
}

/// The recorded `new_stock` snapshot is the value actually persisted after
/// clamping, so it can never be negative.
pub fn validate_new_stock(new_stock: i32) -> Result<(), &'static str> {
    if new_stock < 0 {
        return Err("new stock snapshot cannot be negative");
    }
    Ok(())
}

/// Derive the monetary value of a movement.
///
/// When a unit cost is supplied the value is `|quantity| * unit_cost`;
/// otherwise an explicitly supplied total wins; otherwise the movement
/// carries no value.
pub fn derive_total_value(
    quantity: i32,
    unit_cost: Option<Decimal>,
    explicit_total: Option<Decimal>,
) -> Option<Decimal> {
    match unit_cost {
        Some(cost) => Some(Decimal::from(quantity.unsigned_abs()) * cost),
        None => explicit_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(-1).is_ok());
    }

    #[test]
    fn nil_product_id_is_rejected() {
        assert!(validate_product_id(Uuid::nil()).is_err());
        assert!(validate_product_id(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn negative_new_stock_is_rejected() {
        assert!(validate_new_stock(-1).is_err());
        assert!(validate_new_stock(0).is_ok());
    }

    #[test]
    fn total_value_uses_absolute_quantity() {
        assert_eq!(
            derive_total_value(-4, Some(dec("2.50")), None),
            Some(dec("10.00"))
        );
    }

    #[test]
    fn explicit_total_is_kept_without_unit_cost() {
        assert_eq!(
            derive_total_value(5, None, Some(dec("99.00"))),
            Some(dec("99.00"))
        );
        assert_eq!(derive_total_value(5, None, None), None);
    }
}
