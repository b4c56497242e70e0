//! Aggregated stats for the dashboard view.

use sqlx::PgPool;
use tracing::instrument;

use stockroom_core::RequestStatus;

use crate::db;
use crate::models::{ActivityEntry, DashboardStats};
use crate::services::ledger::LedgerError;

/// Items with stock below this value count as low.
const LOW_STOCK_THRESHOLD: i64 = 10;

/// How many entries the merged activity feed keeps.
const ACTIVITY_LIMIT: usize = 10;

/// Dashboard aggregation service.
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Collect item counts, pending requests, low stock, and recent
    /// activity in one response.
    ///
    /// Stock movements and request decisions come from separate logs;
    /// the two feeds are merged newest-first and capped.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Repository`] if any query fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, LedgerError> {
        #[allow(clippy::cast_possible_wrap)]
        let limit = ACTIVITY_LIMIT as i64;

        let total_items = db::items::count_active(&self.pool).await?;
        let pending_requests =
            db::requests::count_by_status(&self.pool, RequestStatus::Pending).await?;
        let low_stock_items = db::items::list_low_stock(&self.pool, LOW_STOCK_THRESHOLD).await?;
        let item_activity = db::item_logs::recent_activity(&self.pool, limit).await?;
        let request_activity = db::requests::recent_activity(&self.pool, limit).await?;

        Ok(DashboardStats {
            total_items,
            pending_requests,
            low_stock_items,
            recent_activities: merge_activities(item_activity, request_activity, ACTIVITY_LIMIT),
        })
    }
}

/// Merge two newest-first activity feeds into one, capped at `limit`.
fn merge_activities(
    items: Vec<ActivityEntry>,
    requests: Vec<ActivityEntry>,
    limit: usize,
) -> Vec<ActivityEntry> {
    let mut merged = items;
    merged.extend(requests);
    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged.truncate(limit);
    merged
}
