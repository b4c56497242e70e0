//! Inventory item models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, ItemState};

/// An inventory item.
///
/// `stock` is the single source of truth for on-hand quantity and is only
/// ever mutated through the ledger path, which pairs every change with a
/// log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Optional grouping category.
    pub category: Option<String>,
    /// Optional unit of measure (e.g. "pcs", "box").
    pub unit: Option<String>,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Current stock on hand. Never negative.
    pub stock: i64,
    /// Soft-delete state; reads only ever return `active` items.
    pub state: ItemState,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    /// Item name. Must not be empty.
    pub name: String,
    /// Optional grouping category.
    pub category: Option<String>,
    /// Optional unit of measure.
    pub unit: Option<String>,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Initial stock; defaults to 0. Must not be negative.
    pub stock: Option<i64>,
}

/// Validated insert parameters for an item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub stock: i64,
}

/// Input for a partial item update.
///
/// Absent fields keep their current values. A present `stock` runs
/// through the same adjustment path as the dedicated stock endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    /// Absolute stock value to set, if changing stock.
    pub stock: Option<i64>,
}

/// Input for a deposit or withdrawal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentInput {
    /// Units to move. Must be positive.
    pub quantity: i64,
    /// Optional note for the log entry; a default is derived if absent.
    pub notes: Option<String>,
}

/// Input for setting stock to an absolute value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStockInput {
    /// New stock value. Must not be negative.
    pub stock: i64,
}
