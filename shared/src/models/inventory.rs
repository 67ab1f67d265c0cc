//! Stock movement and stock account models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock movement subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Purchase,
    Sale,
    Waste,
    ReturnCustomer,
    ReturnSupplier,
    AdjustmentIn,
    AdjustmentOut,
    TransferIn,
    TransferOut,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Purchase => "purchase",
            MovementKind::Sale => "sale",
            MovementKind::Waste => "waste",
            MovementKind::ReturnCustomer => "return_customer",
            MovementKind::ReturnSupplier => "return_supplier",
            MovementKind::AdjustmentIn => "adjustment_in",
            MovementKind::AdjustmentOut => "adjustment_out",
            MovementKind::TransferIn => "transfer_in",
            MovementKind::TransferOut => "transfer_out",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "purchase" => Some(MovementKind::Purchase),
            "sale" => Some(MovementKind::Sale),
            "waste" => Some(MovementKind::Waste),
            "return_customer" => Some(MovementKind::ReturnCustomer),
            "return_supplier" => Some(MovementKind::ReturnSupplier),
            "adjustment_in" => Some(MovementKind::AdjustmentIn),
            "adjustment_out" => Some(MovementKind::AdjustmentOut),
            "transfer_in" => Some(MovementKind::TransferIn),
            "transfer_out" => Some(MovementKind::TransferOut),
            _ => None,
        }
    }

    /// Direction implied by the subtype
    ///
    /// The match is total over the closed enum, so every subtype has a
    /// direction by construction.
    pub fn direction(&self) -> MovementDirection {
        match self {
            MovementKind::Purchase
            | MovementKind::ReturnCustomer
            | MovementKind::AdjustmentIn
            | MovementKind::TransferIn => MovementDirection::In,
            MovementKind::Sale
            | MovementKind::Waste
            | MovementKind::ReturnSupplier
            | MovementKind::AdjustmentOut
            | MovementKind::TransferOut => MovementDirection::Out,
        }
    }
}

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(MovementDirection::In),
            "out" => Some(MovementDirection::Out),
            _ => None,
        }
    }
}

/// An immutable stock ledger entry
///
/// Movements are append-only: never mutated or deleted after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub tenant_id: Uuid,
    pub store_id: Uuid,
    pub account_id: Uuid,
    pub direction: MovementDirection,
    pub kind: MovementKind,
    pub quantity: Decimal,
    /// Unit cost at the time of the movement, when known
    pub unit_cost: Option<Decimal>,
    /// Unit symbol the quantity is expressed in, for traceability
    pub unit_symbol: Option<String>,
    pub reason: String,
    /// External document number (order number, invoice number)
    pub document_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-(store, stock-keeping unit) balance aggregate
///
/// Created lazily with zero defaults on the first movement against the key
/// and mutated in place by every subsequent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAccount {
    pub id: Uuid,
    pub store_id: Uuid,
    pub sku_id: Uuid,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
