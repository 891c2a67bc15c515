//! Movement ledger tests
//!
//! Covers the validation gate every append runs through and the
//! total-value derivation applied before a row is written.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::validation::{
    derive_total_value, validate_new_stock, validate_product_id, validate_quantity,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Recording quantity = 0 always fails validation, both directions
    /// around zero are fine.
    #[test]
    fn zero_quantity_never_validates() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(-100).is_ok());
        assert!(validate_quantity(i32::MIN).is_ok());
    }

    #[test]
    fn missing_product_id_never_validates() {
        assert!(validate_product_id(Uuid::nil()).is_err());
        assert!(validate_product_id(Uuid::new_v4()).is_ok());
    }

    /// The new-stock snapshot records the clamped value actually
    /// persisted, so a negative snapshot is a caller bug.
    #[test]
    fn negative_new_stock_snapshot_is_rejected() {
        assert!(validate_new_stock(-1).is_err());
        assert!(validate_new_stock(0).is_ok());
        assert!(validate_new_stock(10).is_ok());
    }

    #[test]
    fn unit_cost_derives_total_value_from_absolute_quantity() {
        // An outbound movement of 4 units at 2.50 each is worth 10.00.
        assert_eq!(
            derive_total_value(-4, Some(dec("2.50")), None),
            Some(dec("10.00"))
        );
        assert_eq!(
            derive_total_value(4, Some(dec("2.50")), None),
            Some(dec("10.00"))
        );
    }

    #[test]
    fn unit_cost_wins_over_explicit_total() {
        assert_eq!(
            derive_total_value(2, Some(dec("3.00")), Some(dec("999.00"))),
            Some(dec("6.00"))
        );
    }

    #[test]
    fn explicit_total_used_without_unit_cost() {
        assert_eq!(
            derive_total_value(2, None, Some(dec("7.00"))),
            Some(dec("7.00"))
        );
        assert_eq!(derive_total_value(2, None, None), None);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    fn cost_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// total_value = |quantity| * unit_cost for every non-zero quantity.
        #[test]
        fn prop_total_value_uses_absolute_quantity(
            quantity in -10_000i32..=10_000,
            cost in cost_strategy()
        ) {
            prop_assume!(quantity != 0);
            let value = derive_total_value(quantity, Some(cost), None).unwrap();
            prop_assert_eq!(value, Decimal::from(quantity.unsigned_abs()) * cost);
            prop_assert!(value > Decimal::ZERO);
        }

        /// The sign of the quantity never leaks into the value.
        #[test]
        fn prop_total_value_sign_invariant(
            quantity in 1i32..=10_000,
            cost in cost_strategy()
        ) {
            prop_assert_eq!(
                derive_total_value(quantity, Some(cost), None),
                derive_total_value(-quantity, Some(cost), None)
            );
        }

        /// Validation accepts exactly the non-zero quantities.
        #[test]
        fn prop_quantity_validation_partition(quantity in any::<i32>()) {
            prop_assert_eq!(validate_quantity(quantity).is_ok(), quantity != 0);
        }
    }
}
