//! Costing engine tests
//!
//! Covers the weighted-average balance algebra behind `register` and the
//! subtype-to-direction table.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{MovementDirection, MovementKind};
use stock_engine::services::stock::next_balance;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Every inbound subtype maps to `in`, every outbound one to `out`
    #[test]
    fn test_direction_table() {
        let inbound = [
            MovementKind::Purchase,
            MovementKind::ReturnCustomer,
            MovementKind::AdjustmentIn,
            MovementKind::TransferIn,
        ];
        let outbound = [
            MovementKind::Sale,
            MovementKind::Waste,
            MovementKind::ReturnSupplier,
            MovementKind::AdjustmentOut,
            MovementKind::TransferOut,
        ];

        for kind in inbound {
            assert_eq!(kind.direction(), MovementDirection::In, "{:?}", kind);
        }
        for kind in outbound {
            assert_eq!(kind.direction(), MovementDirection::Out, "{:?}", kind);
        }
    }

    /// Subtype string round-trip
    #[test]
    fn test_kind_string_round_trip() {
        let kinds = [
            MovementKind::Purchase,
            MovementKind::Sale,
            MovementKind::Waste,
            MovementKind::ReturnCustomer,
            MovementKind::ReturnSupplier,
            MovementKind::AdjustmentIn,
            MovementKind::AdjustmentOut,
            MovementKind::TransferIn,
            MovementKind::TransferOut,
        ];
        for kind in kinds {
            assert_eq!(MovementKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MovementKind::from_str("melt"), None);
    }

    /// The purchase/sale scenario: 10 @ 2.00, then 5 @ 3.20, then 4 sold
    #[test]
    fn test_purchase_then_sale_scenario() {
        let (qty, cost) = next_balance(
            Decimal::ZERO,
            Decimal::ZERO,
            MovementDirection::In,
            dec("10"),
            Some(dec("2.00")),
        );
        assert_eq!(qty, dec("10"));
        assert_eq!(cost, dec("2.00"));

        let (qty, cost) = next_balance(qty, cost, MovementDirection::In, dec("5"), Some(dec("3.20")));
        assert_eq!(qty, dec("15"));
        // (10 * 2.00 + 5 * 3.20) / 15 = 2.40
        assert_eq!(cost, dec("2.40"));

        let (qty, cost) = next_balance(qty, cost, MovementDirection::Out, dec("4"), None);
        assert_eq!(qty, dec("11"));
        assert_eq!(cost, dec("2.40"));
    }

    /// Inbound movement without a cost leaves the average untouched
    #[test]
    fn test_in_without_cost_keeps_average() {
        let (qty, cost) = next_balance(
            dec("8"),
            dec("1.25"),
            MovementDirection::In,
            dec("2"),
            None,
        );
        assert_eq!(qty, dec("10"));
        assert_eq!(cost, dec("1.25"));
    }

    /// Restock of an account that was driven negative
    #[test]
    fn test_restock_from_negative_balance() {
        let (qty, cost) = next_balance(
            dec("-3"),
            dec("2.00"),
            MovementDirection::In,
            dec("3"),
            Some(dec("2.50")),
        );
        // -3 + 3 = 0: the divide-by-zero guard takes the incoming cost
        assert_eq!(qty, Decimal::ZERO);
        assert_eq!(cost, dec("2.50"));
    }

    /// Outbound movements may drive the balance negative
    #[test]
    fn test_out_below_zero() {
        let (qty, cost) = next_balance(
            dec("2"),
            dec("4.00"),
            MovementDirection::Out,
            dec("5"),
            None,
        );
        assert_eq!(qty, dec("-3"));
        assert_eq!(cost, dec("4.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid quantities (positive decimals)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1)) // 0.1 to 1000.0
    }

    /// Strategy for generating valid unit costs
    fn cost_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Inbound movements add exactly the moved quantity
        #[test]
        fn prop_in_adds_quantity(
            start in quantity_strategy(),
            moved in quantity_strategy(),
            cost in cost_strategy()
        ) {
            let (qty, _) = next_balance(start, dec("1.00"), MovementDirection::In, moved, Some(cost));
            prop_assert_eq!(qty, start + moved);
        }

        /// Outbound movements subtract exactly the moved quantity and never
        /// touch the average cost
        #[test]
        fn prop_out_subtracts_and_preserves_cost(
            start in quantity_strategy(),
            moved in quantity_strategy(),
            avg in cost_strategy()
        ) {
            let (qty, cost) = next_balance(start, avg, MovementDirection::Out, moved, None);
            prop_assert_eq!(qty, start - moved);
            prop_assert_eq!(cost, avg);
        }

        /// The new average equals the weighted-average formula
        #[test]
        fn prop_weighted_average_formula(
            start in quantity_strategy(),
            old_cost in cost_strategy(),
            moved in quantity_strategy(),
            new_cost in cost_strategy()
        ) {
            let (_, cost) = next_balance(start, old_cost, MovementDirection::In, moved, Some(new_cost));
            let expected = (start * old_cost + moved * new_cost) / (start + moved);
            prop_assert_eq!(cost, expected);
        }

        /// The blended average stays between the two input costs
        #[test]
        fn prop_average_bounded_by_inputs(
            start in quantity_strategy(),
            old_cost in cost_strategy(),
            moved in quantity_strategy(),
            new_cost in cost_strategy()
        ) {
            let (_, cost) = next_balance(start, old_cost, MovementDirection::In, moved, Some(new_cost));
            let low = old_cost.min(new_cost);
            let high = old_cost.max(new_cost);
            prop_assert!(cost >= low);
            prop_assert!(cost <= high);
        }

        /// A full cycle in and out returns to the starting quantity
        #[test]
        fn prop_in_then_out_restores_quantity(
            start in quantity_strategy(),
            moved in quantity_strategy(),
            cost in cost_strategy()
        ) {
            let (qty, avg) = next_balance(start, dec("1.00"), MovementDirection::In, moved, Some(cost));
            let (qty, _) = next_balance(qty, avg, MovementDirection::Out, moved, None);
            prop_assert_eq!(qty, start);
        }
    }
}
