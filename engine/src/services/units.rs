//! Unit conversion service over the unit reference tables

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Unit, UnitConversion};
use shared::validation::{validate_conversion_factor, validate_unit_symbol};

/// Unit conversion service holding immutable reference maps
///
/// Built once at startup and passed by reference wherever conversions are
/// needed. There is no hidden process-wide state: tests build their own
/// instance from in-memory tables.
#[derive(Debug, Clone)]
pub struct UnitConversionService {
    by_symbol: HashMap<String, Unit>,
    factors: HashMap<(Uuid, Uuid), Decimal>,
}

/// Row for unit query
#[derive(Debug, FromRow)]
struct UnitRow {
    id: Uuid,
    symbol: String,
}

/// Row for conversion edge query
#[derive(Debug, FromRow)]
struct ConversionRow {
    from_unit_id: Uuid,
    to_unit_id: Uuid,
    factor: Decimal,
}

impl UnitConversionService {
    /// Load units and conversion edges from the database
    pub async fn load(db: &PgPool) -> AppResult<Self> {
        let units = sqlx::query_as::<_, UnitRow>("SELECT id, symbol FROM units")
            .fetch_all(db)
            .await?;

        let conversions = sqlx::query_as::<_, ConversionRow>(
            "SELECT from_unit_id, to_unit_id, factor FROM unit_conversions",
        )
        .fetch_all(db)
        .await?;

        let service = Self::from_tables(
            units
                .into_iter()
                .map(|r| Unit {
                    id: r.id,
                    symbol: r.symbol,
                })
                .collect(),
            conversions
                .into_iter()
                .map(|r| UnitConversion {
                    from_unit_id: r.from_unit_id,
                    to_unit_id: r.to_unit_id,
                    factor: r.factor,
                })
                .collect(),
        );

        tracing::info!(
            units = service.by_symbol.len(),
            edges = service.factors.len(),
            "Unit conversion tables loaded"
        );

        Ok(service)
    }

    /// Build the service from in-memory reference tables
    ///
    /// Edges with an unusable factor are dropped rather than poisoning
    /// every later conversion through them.
    pub fn from_tables(units: Vec<Unit>, conversions: Vec<UnitConversion>) -> Self {
        let mut by_symbol = HashMap::with_capacity(units.len());
        for unit in units {
            if let Err(e) = validate_unit_symbol(&unit.symbol) {
                tracing::warn!(symbol = %unit.symbol, "Dropping unit: {e}");
                continue;
            }
            by_symbol.insert(unit.symbol.clone(), unit);
        }

        let mut factors = HashMap::with_capacity(conversions.len());
        for edge in conversions {
            if let Err(e) = validate_conversion_factor(edge.factor) {
                tracing::warn!(
                    from = %edge.from_unit_id,
                    to = %edge.to_unit_id,
                    "Dropping conversion edge: {e}"
                );
                continue;
            }
            factors.insert((edge.from_unit_id, edge.to_unit_id), edge.factor);
        }

        Self { by_symbol, factors }
    }

    /// Look up a unit by its symbol
    pub fn resolve(&self, symbol: &str) -> AppResult<&Unit> {
        self.by_symbol
            .get(symbol)
            .ok_or_else(|| AppError::NotFound(format!("Unit '{}'", symbol)))
    }

    /// Convert a quantity between two units
    ///
    /// Identity when the symbols match; otherwise a direct edge multiplies
    /// by its factor and a reverse edge divides. Only single-hop lookup is
    /// supported: transitive chains are not searched.
    pub fn convert(&self, quantity: Decimal, from: &str, to: &str) -> AppResult<Decimal> {
        if from == to {
            return Ok(quantity);
        }

        let unresolved = || AppError::UnresolvedConversion {
            from: from.to_string(),
            to: to.to_string(),
        };

        let from_unit = self.by_symbol.get(from).ok_or_else(unresolved)?;
        let to_unit = self.by_symbol.get(to).ok_or_else(unresolved)?;

        if let Some(factor) = self.factors.get(&(from_unit.id, to_unit.id)) {
            return Ok(quantity * factor);
        }
        if let Some(factor) = self.factors.get(&(to_unit.id, from_unit.id)) {
            return Ok(quantity / factor);
        }

        Err(unresolved())
    }
}
