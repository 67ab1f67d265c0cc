//! Validation utilities for the Store Back Office Platform

use rust_decimal::Decimal;

/// Validate that a movement or recipe quantity is strictly positive
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate that a unit cost is not negative
pub fn validate_unit_cost(cost: Decimal) -> Result<(), &'static str> {
    if cost < Decimal::ZERO {
        return Err("Unit cost cannot be negative");
    }
    Ok(())
}

/// Validate that a unit conversion factor is usable
///
/// A zero factor would make the implied inverse direction divide by zero.
pub fn validate_conversion_factor(factor: Decimal) -> Result<(), &'static str> {
    if factor <= Decimal::ZERO {
        return Err("Conversion factor must be positive");
    }
    Ok(())
}

/// Validate a unit symbol (non-empty short code)
pub fn validate_unit_symbol(symbol: &str) -> Result<(), &'static str> {
    if symbol.trim().is_empty() {
        return Err("Unit symbol cannot be empty");
    }
    if symbol.len() > 16 {
        return Err("Unit symbol is too long");
    }
    Ok(())
}
