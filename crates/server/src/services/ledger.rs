//! Item registry and the canonical stock mutation path.
//!
//! Every stock change funnels through [`apply_stock_delta`]: deposits,
//! withdrawals, absolute updates, series allocation, and request
//! fulfilment all lock the item row, write the new stock, and append the
//! matching log entry inside one transaction. The sum of an item's log
//! deltas therefore always equals its current stock.

use std::fmt;

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::{info, instrument};

use stockroom_core::{ItemId, RangeError, RequestId, RequestStatus, StockAction};

use crate::db::{self, RepositoryError};
use crate::models::{
    CreateItemInput, Item, ItemLog, NewItem, NewItemLog, SetStockInput, StockAdjustmentInput,
    UpdateItemInput,
};

/// Entities a lookup can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Item,
    Series,
    Request,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "User",
            Self::Item => "Item",
            Self::Series => "Series",
            Self::Request => "Request",
        };
        write!(f, "{name}")
    }
}

/// Failures shared by the ledger, series, and request services.
///
/// Variant messages are returned verbatim in API response envelopes.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced entity does not exist (or is soft-deleted).
    #[error("{0} not found")]
    NotFound(Entity),
    /// A series range whose start exceeds its end.
    #[error("Invalid range: {0}")]
    InvalidRange(RangeError),
    /// A series range intersecting an existing one for the same item.
    #[error("Series {range} overlaps an existing series for this item")]
    OverlapDetected { range: String },
    /// A withdrawal larger than the available stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },
    /// A workflow transition from the wrong status.
    #[error("Request {id} is {actual}, expected {expected}")]
    InvalidState {
        id: RequestId,
        expected: RequestStatus,
        actual: RequestStatus,
    },
    /// Malformed input that passed deserialization.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// Storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<RangeError> for LedgerError {
    fn from(err: RangeError) -> Self {
        match err {
            RangeError::Inverted { .. } => Self::InvalidRange(err),
            RangeError::NoDigits | RangeError::TooManyDigits { .. } => {
                Self::InvalidValue(err.to_string())
            }
        }
    }
}

/// Apply a signed stock delta to a locked item and append the matching
/// log entry.
///
/// Callers must have fetched `item` with `FOR UPDATE` inside the same
/// transaction. This is the only code path that changes `items.stock`
/// after creation, which is what keeps stock and log history consistent.
///
/// # Errors
///
/// Returns [`LedgerError::InsufficientStock`] if the delta would take
/// stock below zero.
pub(crate) async fn apply_stock_delta(
    conn: &mut PgConnection,
    item: &Item,
    delta: i64,
    action: StockAction,
    notes: String,
) -> Result<Item, LedgerError> {
    let stock = item.stock + delta;
    if stock < 0 {
        return Err(LedgerError::InsufficientStock {
            requested: -delta,
            available: item.stock,
        });
    }

    let updated = db::items::set_stock(&mut *conn, item.id, stock).await?;
    db::item_logs::append(
        &mut *conn,
        &NewItemLog {
            item_id: item.id,
            action,
            delta,
            notes: Some(notes),
        },
    )
    .await?;

    Ok(updated)
}

/// Item registry and stock ledger service.
pub struct LedgerService {
    pool: PgPool,
}

impl LedgerService {
    /// Create a new ledger service.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an item, logging its initial stock as a deposit.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidValue`] for an empty name or
    /// negative initial stock.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_item(&self, input: CreateItemInput) -> Result<Item, LedgerError> {
        if input.name.trim().is_empty() {
            return Err(LedgerError::InvalidValue("name must not be empty".to_string()));
        }
        let stock = input.stock.unwrap_or(0);
        if stock < 0 {
            return Err(LedgerError::InvalidValue(
                "initial stock cannot be negative".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let item = db::items::insert(
            &mut *tx,
            &NewItem {
                name: input.name,
                category: input.category,
                unit: input.unit,
                description: input.description,
                stock,
            },
        )
        .await?;
        db::item_logs::append(
            &mut *tx,
            &NewItemLog {
                item_id: item.id,
                action: StockAction::Deposit,
                delta: stock,
                notes: Some("Initial stock".to_string()),
            },
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %item.id, stock, "Created item");
        Ok(item)
    }

    /// Fetch an active item.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the item does not exist or
    /// has been deleted.
    pub async fn get_item(&self, id: ItemId) -> Result<Item, LedgerError> {
        db::items::find_active(&self.pool, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))
    }

    /// List all active items, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Repository`] if the query fails.
    pub async fn list_items(&self) -> Result<Vec<Item>, LedgerError> {
        Ok(db::items::list_active(&self.pool).await?)
    }

    /// List active items in a category, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Repository`] if the query fails.
    pub async fn list_items_by_category(&self, category: &str) -> Result<Vec<Item>, LedgerError> {
        Ok(db::items::list_active_by_category(&self.pool, category).await?)
    }

    /// Update an item's fields, routing a stock change through the
    /// ledger path.
    ///
    /// Absent fields keep their current values. A present `stock` is
    /// applied as a signed delta against the current value and logged;
    /// an unchanged value writes no log entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the item is missing and
    /// [`LedgerError::InvalidValue`] for a negative stock.
    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        id: ItemId,
        input: UpdateItemInput,
    ) -> Result<Item, LedgerError> {
        if let Some(stock) = input.stock
            && stock < 0
        {
            return Err(LedgerError::InvalidValue("stock cannot be negative".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        db::items::find_active_for_update(&mut *tx, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        let mut item = db::items::update_fields(&mut *tx, id, &input).await?;

        if let Some(stock) = input.stock {
            let delta = stock - item.stock;
            if delta != 0 {
                item = apply_stock_delta(
                    &mut tx,
                    &item,
                    delta,
                    StockAction::Update,
                    format!("Manual adjustment: {delta:+}"),
                )
                .await?;
            }
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %item.id, "Updated item");
        Ok(item)
    }

    /// Add stock to an item.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidValue`] for a non-positive quantity
    /// and [`LedgerError::NotFound`] if the item is missing.
    #[instrument(skip(self, input), fields(quantity = input.quantity))]
    pub async fn deposit(
        &self,
        id: ItemId,
        input: StockAdjustmentInput,
    ) -> Result<Item, LedgerError> {
        if input.quantity <= 0 {
            return Err(LedgerError::InvalidValue("quantity must be positive".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let item = db::items::find_active_for_update(&mut *tx, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        let notes = input
            .notes
            .unwrap_or_else(|| format!("Deposited {} to {}", input.quantity, item.name));
        let updated =
            apply_stock_delta(&mut tx, &item, input.quantity, StockAction::Deposit, notes).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %updated.id, stock = updated.stock, "Deposited stock");
        Ok(updated)
    }

    /// Remove stock from an item.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidValue`] for a non-positive quantity,
    /// [`LedgerError::NotFound`] if the item is missing, and
    /// [`LedgerError::InsufficientStock`] if fewer units are on hand than
    /// requested.
    #[instrument(skip(self, input), fields(quantity = input.quantity))]
    pub async fn withdraw(
        &self,
        id: ItemId,
        input: StockAdjustmentInput,
    ) -> Result<Item, LedgerError> {
        if input.quantity <= 0 {
            return Err(LedgerError::InvalidValue("quantity must be positive".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let item = db::items::find_active_for_update(&mut *tx, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        let notes = input
            .notes
            .unwrap_or_else(|| format!("Withdrew {} from {}", input.quantity, item.name));
        let updated =
            apply_stock_delta(&mut tx, &item, -input.quantity, StockAction::Withdraw, notes)
                .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %updated.id, stock = updated.stock, "Withdrew stock");
        Ok(updated)
    }

    /// Set an item's stock to an absolute value, logging the difference.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidValue`] for a negative value and
    /// [`LedgerError::NotFound`] if the item is missing.
    #[instrument(skip(self, input), fields(stock = input.stock))]
    pub async fn set_stock(&self, id: ItemId, input: SetStockInput) -> Result<Item, LedgerError> {
        if input.stock < 0 {
            return Err(LedgerError::InvalidValue("stock cannot be negative".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let item = db::items::find_active_for_update(&mut *tx, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        let delta = input.stock - item.stock;
        let updated = if delta == 0 {
            item
        } else {
            apply_stock_delta(
                &mut tx,
                &item,
                delta,
                StockAction::Update,
                format!("Manual adjustment: {delta:+}"),
            )
            .await?
        };

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %updated.id, stock = updated.stock, "Set stock");
        Ok(updated)
    }

    /// Soft-delete an item.
    ///
    /// The item's log history and series stay in place; the item just
    /// stops appearing in reads.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the item does not exist or
    /// was already deleted.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: ItemId) -> Result<Item, LedgerError> {
        let item = db::items::soft_delete(&self.pool, id)
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound => LedgerError::NotFound(Entity::Item),
                other => LedgerError::Repository(other),
            })?;

        info!(id = %item.id, "Deleted item");
        Ok(item)
    }

    /// List every stock log entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Repository`] if the query fails.
    pub async fn list_logs(&self) -> Result<Vec<ItemLog>, LedgerError> {
        Ok(db::item_logs::list_all(&self.pool).await?)
    }

    /// List an active item's stock log entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the item does not exist or
    /// has been deleted.
    pub async fn logs_for_item(&self, id: ItemId) -> Result<Vec<ItemLog>, LedgerError> {
        db::items::find_active(&self.pool, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        Ok(db::item_logs::list_for_item(&self.pool, id).await?)
    }
}
