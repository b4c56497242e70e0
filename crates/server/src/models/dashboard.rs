//! Dashboard overview models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::ItemId;

/// Aggregated dashboard snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Count of active items.
    pub total_items: i64,
    /// Count of requests still pending a decision.
    pub pending_requests: i64,
    /// Active items below the low-stock threshold.
    pub low_stock_items: Vec<LowStockItem>,
    /// Most recent stock and request activity, newest first.
    pub recent_activities: Vec<ActivityEntry>,
}

/// Slim item projection for the low-stock list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub id: ItemId,
    pub name: String,
    pub stock: i64,
    pub category: Option<String>,
}

/// Which log a merged activity entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Item,
    Request,
}

/// One entry in the merged recent-activity feed.
///
/// Item-log entries report "System" as the user; request-log entries
/// report the recorded actor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Source log entry ID (item or request log, per `kind`).
    pub id: i32,
    /// Action string as recorded on the source log.
    pub action: String,
    /// Name of the item involved.
    pub item_name: String,
    /// Who performed the action.
    pub user: String,
    /// When the action happened.
    pub date: DateTime<Utc>,
    /// Source log table.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}
