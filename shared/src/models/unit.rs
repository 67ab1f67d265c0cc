//! Measurement unit reference data

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A measurement unit, identified by a unique short symbol (`kg`, `ml`, `un`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unit {
    pub id: Uuid,
    pub symbol: String,
}

/// A directed conversion edge between two units
///
/// Converting along the edge multiplies by `factor`; the inverse direction
/// is implied (divide by `factor`) and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConversion {
    pub from_unit_id: Uuid,
    pub to_unit_id: Uuid,
    pub factor: Decimal,
}
