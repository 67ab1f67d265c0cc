//! Order-line input aggregate
//!
//! The order-finalization collaborator hands the engine one of these per
//! sold line, with the bill-of-materials graph already resolved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Addon, OptionItem, SellableUnit};

/// A sold order line with its resolved bill-of-materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub tenant_id: Uuid,
    pub store_id: Uuid,
    /// User who finalized the order
    pub actor_id: Uuid,
    pub order_number: String,
    pub variant: SellableUnit,
    pub quantity: Decimal,
    /// Unit cost recorded on the line at sale time
    pub cost_price: Decimal,
    pub selected_options: Vec<SelectedOption>,
    pub addons: Vec<AddonSelection>,
}

/// A combo option the customer chose on this line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedOption {
    /// None when the option item did not survive eager loading
    pub item: Option<OptionItem>,
    /// How many of this option were chosen
    pub quantity: Decimal,
}

/// An add-on the customer chose on this line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonSelection {
    /// None when the add-on did not survive eager loading
    pub addon: Option<Addon>,
    pub quantity: Decimal,
}
