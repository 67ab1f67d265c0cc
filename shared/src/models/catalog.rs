//! Bill-of-materials graph models
//!
//! Read-only reference data consumed by the sale decomposition engine. The
//! graph is managed by the admin catalog screens and arrives here already
//! resolved (eagerly loaded) on the order line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An elementary inventory-tracked entity consumed by recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    /// Running cost per one stock unit
    pub cost_price: Decimal,
    /// Symbol of the unit the ingredient's stock is kept in
    pub stock_unit: String,
}

/// One line of a recipe: an ingredient, the unit the quantity is declared
/// in, and the quantity consumed per one produced item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLine {
    /// None when the ingredient did not survive eager loading; such lines
    /// are skipped during decomposition
    pub ingredient: Option<Ingredient>,
    pub unit: String,
    pub quantity: Decimal,
}

/// How a sellable unit participates in stock tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockBehavior {
    /// No movements are generated for this unit itself
    Unmanaged,
    /// The unit consumes its own stock account directly
    Direct,
    /// The unit is produced at sale time by consuming its recipe
    Produced { recipe: Vec<RecipeLine> },
}

/// A store-scoped sellable product variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellableUnit {
    pub id: Uuid,
    pub name: String,
    pub stock: StockBehavior,
    /// Fixed combo components, consumed with every sale of this unit
    pub combo_components: Vec<ComboComponent>,
    /// Option groups the customer chooses from when this unit is a combo
    pub option_groups: Vec<OptionGroup>,
}

/// A fixed component of a combo, itself a sellable unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboComponent {
    pub variant: SellableUnit,
    pub quantity: Decimal,
}

/// A group of combo options the customer picks from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionGroup {
    pub id: Uuid,
    pub name: String,
    pub items: Vec<OptionItem>,
}

/// One choosable combo option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: Uuid,
    /// None when the referenced variant did not survive eager loading
    pub variant: Option<SellableUnit>,
    pub extra_price: Decimal,
    /// Portion consumed per one selection of this option
    pub quantity: Decimal,
}

/// An add-on with its own ingredient recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Addon {
    pub id: Uuid,
    pub name: String,
    pub recipe: Vec<RecipeLine>,
}
