//! Validation helper tests

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::validation::{
    validate_conversion_factor, validate_quantity, validate_unit_cost, validate_unit_symbol,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_quantity_must_be_positive() {
    assert!(validate_quantity(dec("0.1")).is_ok());
    assert!(validate_quantity(Decimal::ZERO).is_err());
    assert!(validate_quantity(dec("-1")).is_err());
}

#[test]
fn test_unit_cost_cannot_be_negative() {
    assert!(validate_unit_cost(Decimal::ZERO).is_ok());
    assert!(validate_unit_cost(dec("2.40")).is_ok());
    assert!(validate_unit_cost(dec("-0.01")).is_err());
}

#[test]
fn test_conversion_factor_must_be_positive() {
    assert!(validate_conversion_factor(dec("1000")).is_ok());
    assert!(validate_conversion_factor(Decimal::ZERO).is_err());
    assert!(validate_conversion_factor(dec("-2")).is_err());
}

#[test]
fn test_unit_symbol_shape() {
    assert!(validate_unit_symbol("kg").is_ok());
    assert!(validate_unit_symbol("").is_err());
    assert!(validate_unit_symbol("   ").is_err());
    assert!(validate_unit_symbol("averyverylongunitsymbol").is_err());
}

proptest! {
    /// Any strictly positive decimal is a valid quantity
    #[test]
    fn prop_positive_quantities_valid(n in 1i64..=1_000_000i64) {
        prop_assert!(validate_quantity(Decimal::new(n, 2)).is_ok());
    }

    /// Negation flips validity for non-zero quantities
    #[test]
    fn prop_negative_quantities_invalid(n in 1i64..=1_000_000i64) {
        prop_assert!(validate_quantity(-Decimal::new(n, 2)).is_err());
    }
}
