//! Stock ledger log models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, ItemLogId, StockAction};

/// One append-only stock movement entry.
///
/// `delta` is signed: summing the deltas of an item's complete history
/// from zero reproduces its current stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLog {
    /// Unique log entry ID.
    pub id: ItemLogId,
    /// Item the movement applied to.
    pub item_id: ItemId,
    /// Movement kind.
    pub action: StockAction,
    /// Signed stock change.
    pub delta: i64,
    /// Free-form note describing the movement.
    pub notes: Option<String>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// Insert parameters for a log entry.
#[derive(Debug, Clone)]
pub struct NewItemLog {
    pub item_id: ItemId,
    pub action: StockAction,
    pub delta: i64,
    pub notes: Option<String>,
}
