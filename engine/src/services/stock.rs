//! Stock ledger and weighted-average costing service
//!
//! The single authoritative write path for stock: every balance change goes
//! through `register`, which updates the (store, SKU) account and appends an
//! immutable movement in one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{MovementDirection, MovementKind, StockAccount, StockMovement};
use shared::types::{DateRange, Pagination};
use shared::validation::{validate_quantity, validate_unit_cost};

/// Stock service for registering movements and reading balances
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Input for registering a stock movement
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMovement {
    pub actor_id: Uuid,
    pub tenant_id: Uuid,
    pub store_id: Uuid,
    pub sku_id: Uuid,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub unit_symbol: Option<String>,
    pub reason: String,
    pub document_number: Option<String>,
}

/// Row for account query
#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    store_id: Uuid,
    sku_id: Uuid,
    quantity: Decimal,
    average_cost: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for StockAccount {
    fn from(row: AccountRow) -> Self {
        StockAccount {
            id: row.id,
            store_id: row.store_id,
            sku_id: row.sku_id,
            quantity: row.quantity,
            average_cost: row.average_cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row for movement query
#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    actor_id: Uuid,
    tenant_id: Uuid,
    store_id: Uuid,
    account_id: Uuid,
    direction: String,
    kind: String,
    quantity: Decimal,
    unit_cost: Option<Decimal>,
    unit_symbol: Option<String>,
    reason: String,
    document_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl MovementRow {
    fn into_domain(self) -> AppResult<StockMovement> {
        let direction = MovementDirection::from_str(&self.direction)
            .ok_or_else(|| AppError::Internal(format!("Unknown direction '{}'", self.direction)))?;
        let kind = MovementKind::from_str(&self.kind)
            .ok_or_else(|| AppError::Internal(format!("Unknown movement kind '{}'", self.kind)))?;

        Ok(StockMovement {
            id: self.id,
            actor_id: self.actor_id,
            tenant_id: self.tenant_id,
            store_id: self.store_id,
            account_id: self.account_id,
            direction,
            kind,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            unit_symbol: self.unit_symbol,
            reason: self.reason,
            document_number: self.document_number,
            created_at: self.created_at,
        })
    }
}

/// Apply one movement to an account balance
///
/// `in` with a unit cost recomputes the weighted-average cost as
/// `(qty*avg + move_qty*cost) / (qty + move_qty)`, falling back to the
/// incoming cost when the resulting quantity is zero. `in` without a cost
/// and every `out` leave the average untouched.
pub fn next_balance(
    quantity: Decimal,
    average_cost: Decimal,
    direction: MovementDirection,
    move_quantity: Decimal,
    unit_cost: Option<Decimal>,
) -> (Decimal, Decimal) {
    match direction {
        MovementDirection::In => {
            let new_quantity = quantity + move_quantity;
            let new_cost = match unit_cost {
                Some(cost) if new_quantity.is_zero() => cost,
                Some(cost) => (quantity * average_cost + move_quantity * cost) / new_quantity,
                None => average_cost,
            };
            (new_quantity, new_cost)
        }
        MovementDirection::Out => (quantity - move_quantity, average_cost),
    }
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a stock movement in its own transaction
    pub async fn register(&self, input: &RegisterMovement) -> AppResult<StockMovement> {
        let mut tx = self.db.begin().await?;
        let movement = Self::register_in(&mut *tx, input).await?;
        tx.commit().await?;
        Ok(movement)
    }

    /// Register a stock movement on a caller-supplied connection
    ///
    /// Used by the sale decomposition engine to enclose every leaf of one
    /// order line in a single outer transaction. The account row is locked
    /// with `FOR UPDATE` for the whole read-modify-write, so concurrent
    /// movements against the same (store, SKU) serialize instead of losing
    /// updates.
    pub async fn register_in(
        conn: &mut PgConnection,
        input: &RegisterMovement,
    ) -> AppResult<StockMovement> {
        validate_quantity(input.quantity).map_err(|e| AppError::validation("quantity", e))?;
        if let Some(cost) = input.unit_cost {
            validate_unit_cost(cost).map_err(|e| AppError::validation("unit_cost", e))?;
        }

        let direction = input.kind.direction();

        // Lazily create the zero-balance account, then lock it
        sqlx::query(
            r#"
            INSERT INTO stock_accounts (store_id, sku_id, quantity, average_cost)
            VALUES ($1, $2, 0, 0)
            ON CONFLICT (store_id, sku_id) DO NOTHING
            "#,
        )
        .bind(input.store_id)
        .bind(input.sku_id)
        .execute(&mut *conn)
        .await?;

        let account = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, store_id, sku_id, quantity, average_cost, created_at, updated_at
            FROM stock_accounts
            WHERE store_id = $1 AND sku_id = $2
            FOR UPDATE
            "#,
        )
        .bind(input.store_id)
        .bind(input.sku_id)
        .fetch_one(&mut *conn)
        .await?;

        let (new_quantity, new_cost) = next_balance(
            account.quantity,
            account.average_cost,
            direction,
            input.quantity,
            input.unit_cost,
        );

        if new_quantity < Decimal::ZERO && account.quantity >= Decimal::ZERO {
            tracing::warn!(
                store_id = %input.store_id,
                sku_id = %input.sku_id,
                balance = %new_quantity,
                "Stock account driven negative"
            );
        }

        sqlx::query(
            r#"
            UPDATE stock_accounts
            SET quantity = $1, average_cost = $2, updated_at = now()
            WHERE id = $3
            "#,
        )
        .bind(new_quantity)
        .bind(new_cost)
        .bind(account.id)
        .execute(&mut *conn)
        .await?;

        let movement = sqlx::query_as::<_, MovementRow>(
            r#"
            INSERT INTO stock_movements (
                actor_id, tenant_id, store_id, account_id, direction, kind,
                quantity, unit_cost, unit_symbol, reason, document_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, actor_id, tenant_id, store_id, account_id, direction, kind,
                      quantity, unit_cost, unit_symbol, reason, document_number, created_at
            "#,
        )
        .bind(input.actor_id)
        .bind(input.tenant_id)
        .bind(input.store_id)
        .bind(account.id)
        .bind(direction.as_str())
        .bind(input.kind.as_str())
        .bind(input.quantity)
        .bind(input.unit_cost)
        .bind(&input.unit_symbol)
        .bind(&input.reason)
        .bind(&input.document_number)
        .fetch_one(&mut *conn)
        .await?;

        movement.into_domain()
    }

    /// Get the stock account for a (store, SKU) pair
    pub async fn account(&self, store_id: Uuid, sku_id: Uuid) -> AppResult<StockAccount> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, store_id, sku_id, quantity, average_cost, created_at, updated_at
            FROM stock_accounts
            WHERE store_id = $1 AND sku_id = $2
            "#,
        )
        .bind(store_id)
        .bind(sku_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock account".to_string()))?;

        Ok(row.into())
    }

    /// List all stock account balances for a store
    pub async fn balances(&self, store_id: Uuid) -> AppResult<Vec<StockAccount>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, store_id, sku_id, quantity, average_cost, created_at, updated_at
            FROM stock_accounts
            WHERE store_id = $1
            ORDER BY sku_id
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Movement history for a (store, SKU) pair, newest first
    pub async fn movements(
        &self,
        store_id: Uuid,
        sku_id: Uuid,
        range: Option<DateRange>,
        page: Pagination,
    ) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT m.id, m.actor_id, m.tenant_id, m.store_id, m.account_id, m.direction, m.kind,
                   m.quantity, m.unit_cost, m.unit_symbol, m.reason, m.document_number, m.created_at
            FROM stock_movements m
            JOIN stock_accounts a ON a.id = m.account_id
            WHERE m.store_id = $1 AND a.sku_id = $2
              AND ($3::date IS NULL OR m.created_at::date >= $3)
              AND ($4::date IS NULL OR m.created_at::date <= $4)
            ORDER BY m.created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(store_id)
        .bind(sku_id)
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }
}
