//! Stock reservation tests
//!
//! Exercises the transition planner the reservation engine persists from:
//! the reservation guard, the zero floor, the replay reconciliation law,
//! and the per-item batch semantics.

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;
use validator::Validate;

use shared::{
    plan_stock_update, replay_quantities, OrderItem, StockOperation, StockPlanError,
    StockTransition,
};

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Product at stock 10, reserve 4: stock becomes 6 and the movement
    /// carries previous=10, new=6, quantity=-4.
    #[test]
    fn reserve_within_stock() {
        let transition = plan_stock_update(10, 4, StockOperation::Reserve).unwrap();
        assert_eq!(
            transition,
            StockTransition {
                previous_stock: 10,
                new_stock: 6,
                quantity_delta: -4,
            }
        );
    }

    /// Same product now at 6, reserve 10: the guard rejects the line and
    /// stock is left unchanged.
    #[test]
    fn reserve_beyond_stock_is_rejected() {
        let err = plan_stock_update(6, 10, StockOperation::Reserve).unwrap_err();
        assert_eq!(
            err,
            StockPlanError::InsufficientStock {
                available: 6,
                requested: 10,
            }
        );
    }

    /// Variant at stock 3, release 2: stock becomes 5 with quantity +2.
    #[test]
    fn release_restores_stock() {
        let transition = plan_stock_update(3, 2, StockOperation::Release).unwrap();
        assert_eq!(transition.new_stock, 5);
        assert_eq!(transition.quantity_delta, 2);
    }

    #[test]
    fn release_never_needs_available_stock() {
        let transition = plan_stock_update(0, 50, StockOperation::Release).unwrap();
        assert_eq!(transition.new_stock, 50);
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        for op in [StockOperation::Reserve, StockOperation::Release] {
            assert_eq!(
                plan_stock_update(10, 0, op).unwrap_err(),
                StockPlanError::NonPositiveQuantity
            );
            assert_eq!(
                plan_stock_update(10, -3, op).unwrap_err(),
                StockPlanError::NonPositiveQuantity
            );
        }
    }

    /// A release near the top of the counter range saturates instead of
    /// wrapping through negative and clamping to zero.
    #[test]
    fn release_saturates_instead_of_wrapping() {
        let transition = plan_stock_update(i32::MAX - 1, 5, StockOperation::Release).unwrap();
        assert_eq!(transition.new_stock, i32::MAX);

        assert_eq!(replay_quantities(i32::MAX - 1, [5, 5]), i32::MAX);
    }

    /// Order lines are screened at the service boundary, before any
    /// transaction is opened for them.
    #[test]
    fn order_item_rejects_non_positive_quantity() {
        let item = OrderItem {
            product_id: Uuid::new_v4(),
            variant_id: None,
            quantity: 0,
            product_name: None,
        };
        assert!(item.validate().is_err());

        let item = OrderItem {
            quantity: 1,
            ..item
        };
        assert!(item.validate().is_ok());
    }

    #[test]
    fn operation_delta_signs() {
        assert_eq!(StockOperation::Reserve.delta(7), -7);
        assert_eq!(StockOperation::Release.delta(7), 7);
    }

    /// Replaying a ledger in creation order, clamped at zero per step,
    /// reproduces the final counter.
    #[test]
    fn replay_reconciles_counter() {
        let quantities = [100, -30, -70, -5, 40];
        // 100 -> 70 -> 0 -> 0 (clamped) -> 40
        assert_eq!(replay_quantities(0, quantities), 40);
    }

    /// Batch semantics: a failed line skips, siblings still apply, and the
    /// batch reports success only when every line applied. Mirrors the
    /// per-item commit behavior of the reservation engine.
    #[test]
    fn batch_applies_per_item() {
        let mut stocks: HashMap<&str, i32> =
            HashMap::from([("a", 10), ("b", 1), ("c", 8)]);
        let items = [("a", 4), ("missing", 1), ("b", 5), ("c", 2)];

        let mut errors = Vec::new();
        let mut updated = Vec::new();

        for (key, quantity) in items {
            let Some(stock) = stocks.get(key).copied() else {
                errors.push(format!("{} not found", key));
                continue;
            };
            match plan_stock_update(stock, quantity, StockOperation::Reserve) {
                Ok(transition) => {
                    stocks.insert(key, transition.new_stock);
                    updated.push((key, transition));
                }
                Err(err) => errors.push(format!("{}: {}", key, err)),
            }
        }

        assert_eq!(updated.len(), 2);
        assert_eq!(errors.len(), 2);
        assert_eq!(stocks["a"], 6);
        assert_eq!(stocks["b"], 1); // untouched by the rejected line
        assert_eq!(stocks["c"], 6);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    fn operation_strategy() -> impl Strategy<Value = StockOperation> {
        prop_oneof![Just(StockOperation::Reserve), Just(StockOperation::Release)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Stock never goes negative, whatever the requested delta.
        #[test]
        fn prop_stock_never_negative(
            previous in 0i32..=100_000,
            quantity in 1i32..=100_000,
            op in operation_strategy()
        ) {
            if let Ok(transition) = plan_stock_update(previous, quantity, op) {
                prop_assert!(transition.new_stock >= 0);
            }
        }

        /// The reservation guard fires exactly when requested > available.
        #[test]
        fn prop_reserve_guard(
            previous in 0i32..=10_000,
            quantity in 1i32..=10_000
        ) {
            let result = plan_stock_update(previous, quantity, StockOperation::Reserve);
            if previous < quantity {
                prop_assert_eq!(
                    result.unwrap_err(),
                    StockPlanError::InsufficientStock {
                        available: previous,
                        requested: quantity,
                    }
                );
            } else {
                let transition = result.unwrap();
                prop_assert_eq!(transition.new_stock, previous - quantity);
            }
        }

        /// A guarded reserve never clamps: the arithmetic result is exact.
        #[test]
        fn prop_reserve_is_exact_when_allowed(
            previous in 0i32..=10_000,
            quantity in 1i32..=10_000
        ) {
            prop_assume!(previous >= quantity);
            let transition = plan_stock_update(previous, quantity, StockOperation::Reserve).unwrap();
            prop_assert_eq!(transition.previous_stock + transition.quantity_delta, transition.new_stock);
        }

        /// Reserve then release of the same quantity is identity on stock.
        #[test]
        fn prop_reserve_release_round_trip(
            previous in 0i32..=10_000,
            quantity in 1i32..=10_000
        ) {
            prop_assume!(previous >= quantity);
            let reserved = plan_stock_update(previous, quantity, StockOperation::Reserve).unwrap();
            let released =
                plan_stock_update(reserved.new_stock, quantity, StockOperation::Release).unwrap();
            prop_assert_eq!(released.new_stock, previous);
        }

        /// Replay of successful transitions reconciles with the counter.
        #[test]
        fn prop_replay_matches_sequential_planning(
            start in 0i32..=1_000,
            quantities in prop::collection::vec(1i32..=50, 1..20)
        ) {
            let mut stock = start;
            let mut deltas = Vec::new();
            for (i, quantity) in quantities.iter().enumerate() {
                let op = if i % 2 == 0 { StockOperation::Release } else { StockOperation::Reserve };
                if let Ok(transition) = plan_stock_update(stock, *quantity, op) {
                    stock = transition.new_stock;
                    deltas.push(transition.quantity_delta);
                }
            }
            prop_assert_eq!(replay_quantities(start, deltas), stock);
        }
    }
}
