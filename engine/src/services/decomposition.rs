//! Sale decomposition engine
//!
//! Walks a sold order line's bill-of-materials (recipe lines, fixed combo
//! components, customer-selected options, add-ons) and turns it into the
//! elementary stock consumptions it implies. Planning is a pure tree walk;
//! applying the plan feeds every leaf through the stock ledger inside one
//! transaction per order line.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::stock::{RegisterMovement, StockService};
use crate::services::units::UnitConversionService;
use shared::models::{
    MovementKind, OrderLine, RecipeLine, SellableUnit, StockBehavior, StockMovement,
};

/// One elementary stock consumption implied by a sold order line
#[derive(Debug, Clone, PartialEq)]
pub struct Consumption {
    pub sku_id: Uuid,
    pub name: String,
    pub quantity: Decimal,
    /// Unit the quantity is expressed in; None for whole-variant consumption
    pub unit_symbol: Option<String>,
    pub unit_cost: Decimal,
    pub reason: String,
}

/// Pure decomposition of order lines into elementary consumptions
#[derive(Debug, Clone)]
pub struct SaleDecomposer {
    units: Arc<UnitConversionService>,
}

impl SaleDecomposer {
    /// Create a new SaleDecomposer instance
    pub fn new(units: Arc<UnitConversionService>) -> Self {
        Self { units }
    }

    /// Decompose an order line into the stock consumptions it implies
    ///
    /// Emission order within a line is deterministic: the variant's own
    /// consumption or recipe lines, then fixed combo components (recursing
    /// the same way), then customer-selected options, then add-ons. Missing
    /// relations in the graph are skipped; a cycle through the combo graph
    /// is an error.
    pub fn plan(&self, line: &OrderLine) -> AppResult<Vec<Consumption>> {
        let mut consumptions = Vec::new();
        let mut path = HashSet::new();

        self.walk_variant(line, &line.variant, line.quantity, &mut path, &mut consumptions)?;

        for selected in &line.selected_options {
            let Some(item) = &selected.item else {
                tracing::warn!(
                    order_number = %line.order_number,
                    "Selected option without a catalog item, skipping"
                );
                continue;
            };
            let Some(variant) = &item.variant else {
                tracing::warn!(
                    order_number = %line.order_number,
                    option_item = %item.id,
                    "Option item without a linked variant, skipping"
                );
                continue;
            };
            let effective = item.quantity * selected.quantity * line.quantity;
            self.walk_variant(line, variant, effective, &mut path, &mut consumptions)?;
        }

        for selection in &line.addons {
            let Some(addon) = &selection.addon else {
                tracing::warn!(
                    order_number = %line.order_number,
                    "Add-on selection without a linked add-on, skipping"
                );
                continue;
            };
            let effective = selection.quantity * line.quantity;
            self.consume_recipe(line, &addon.recipe, effective, &mut consumptions)?;
        }

        Ok(consumptions)
    }

    /// Apply rules for one variant: own consumption or recipe, then fixed
    /// combo components, recursing to arbitrary depth
    ///
    /// `path` holds the variant ids on the current recursion path only, so
    /// a diamond (the same component under two combos) is legal while a
    /// true cycle errors out.
    fn walk_variant(
        &self,
        line: &OrderLine,
        variant: &SellableUnit,
        quantity: Decimal,
        path: &mut HashSet<Uuid>,
        out: &mut Vec<Consumption>,
    ) -> AppResult<()> {
        if !path.insert(variant.id) {
            return Err(AppError::CircularBom(variant.name.clone()));
        }

        match &variant.stock {
            StockBehavior::Unmanaged => {
                // No movement for the variant itself; sub-trees below are
                // still processed.
            }
            StockBehavior::Direct => {
                out.push(Consumption {
                    sku_id: variant.id,
                    name: variant.name.clone(),
                    quantity,
                    unit_symbol: None,
                    unit_cost: line.cost_price,
                    reason: sale_reason(&variant.name, &line.order_number),
                });
            }
            StockBehavior::Produced { recipe } => {
                self.consume_recipe(line, recipe, quantity, out)?;
            }
        }

        for component in &variant.combo_components {
            self.walk_variant(line, &component.variant, component.quantity * quantity, path, out)?;
        }

        path.remove(&variant.id);
        Ok(())
    }

    /// Emit one consumption per recipe line, scaled by `multiplier`
    ///
    /// Quantities declared in a unit other than the ingredient's stock unit
    /// are converted; a missing conversion edge aborts the whole line.
    fn consume_recipe(
        &self,
        line: &OrderLine,
        recipe: &[RecipeLine],
        multiplier: Decimal,
        out: &mut Vec<Consumption>,
    ) -> AppResult<()> {
        for recipe_line in recipe {
            let Some(ingredient) = &recipe_line.ingredient else {
                tracing::warn!(
                    order_number = %line.order_number,
                    unit = %recipe_line.unit,
                    "Recipe line without a linked ingredient, skipping"
                );
                continue;
            };

            let mut quantity = recipe_line.quantity * multiplier;
            if recipe_line.unit != ingredient.stock_unit {
                quantity =
                    self.units
                        .convert(quantity, &recipe_line.unit, &ingredient.stock_unit)?;
            }

            out.push(Consumption {
                sku_id: ingredient.id,
                name: ingredient.name.clone(),
                quantity,
                unit_symbol: Some(ingredient.stock_unit.clone()),
                unit_cost: ingredient.cost_price,
                reason: sale_reason(&ingredient.name, &line.order_number),
            });
        }
        Ok(())
    }
}

/// Audit reason for a sale consumption: names the consumed item and the
/// originating order
fn sale_reason(item_name: &str, order_number: &str) -> String {
    format!("Sale of {} for order {}", item_name, order_number)
}

/// Order stock service: plans a sold line and posts the whole plan atomically
#[derive(Clone)]
pub struct OrderStockService {
    db: PgPool,
    decomposer: SaleDecomposer,
}

impl OrderStockService {
    /// Create a new OrderStockService instance
    pub fn new(db: PgPool, units: Arc<UnitConversionService>) -> Self {
        Self {
            db,
            decomposer: SaleDecomposer::new(units),
        }
    }

    /// Decompose a sold order line and register every consumption as a SALE
    /// movement inside a single transaction
    ///
    /// Any failure (unresolvable unit, lock timeout) rolls the whole line
    /// back; no partial set of movements is ever committed.
    pub async fn finalize_order_line(&self, line: &OrderLine) -> AppResult<Vec<StockMovement>> {
        let plan = self.decomposer.plan(line)?;
        if plan.is_empty() {
            tracing::info!(
                order_number = %line.order_number,
                "Order line implies no stock consumption"
            );
            return Ok(Vec::new());
        }

        let mut tx = self.db.begin().await?;
        let mut movements = Vec::with_capacity(plan.len());
        for consumption in &plan {
            let input = RegisterMovement {
                actor_id: line.actor_id,
                tenant_id: line.tenant_id,
                store_id: line.store_id,
                sku_id: consumption.sku_id,
                kind: MovementKind::Sale,
                quantity: consumption.quantity,
                unit_cost: Some(consumption.unit_cost),
                unit_symbol: consumption.unit_symbol.clone(),
                reason: consumption.reason.clone(),
                document_number: Some(line.order_number.clone()),
            };
            movements.push(StockService::register_in(&mut *tx, &input).await?);
        }
        tx.commit().await?;

        tracing::info!(
            order_number = %line.order_number,
            movements = movements.len(),
            "Order line stock finalized"
        );

        Ok(movements)
    }
}
