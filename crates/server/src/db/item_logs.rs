//! Database operations for the append-only stock movement log.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use tracing::debug;

use stockroom_core::{ItemId, ItemLogId};

use super::RepositoryError;
use crate::models::dashboard::{ActivityEntry, ActivityKind};
use crate::models::log::{ItemLog, NewItemLog};

/// Internal row type for log queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemLogRow {
    id: i32,
    item_id: i32,
    action: String,
    delta: i64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ItemLogRow> for ItemLog {
    type Error = RepositoryError;

    fn try_from(row: ItemLogRow) -> Result<Self, Self::Error> {
        let action = row.action.parse().map_err(RepositoryError::DataCorruption)?;
        Ok(Self {
            id: ItemLogId::new(row.id),
            item_id: ItemId::new(row.item_id),
            action,
            delta: row.delta,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for the activity feed.
#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: i32,
    action: String,
    item_name: String,
    created_at: DateTime<Utc>,
}

fn collect_logs(rows: Vec<ItemLogRow>) -> Result<Vec<ItemLog>, RepositoryError> {
    rows.into_iter().map(ItemLog::try_from).collect()
}

/// Append a log entry.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn append<'e, E>(executor: E, entry: &NewItemLog) -> Result<ItemLog, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ItemLogRow>(
        r"
        INSERT INTO item_logs (item_id, action, delta, notes)
        VALUES ($1, $2, $3, $4)
        RETURNING id, item_id, action, delta, notes, created_at
        ",
    )
    .bind(entry.item_id)
    .bind(entry.action.to_string())
    .bind(entry.delta)
    .bind(&entry.notes)
    .fetch_one(executor)
    .await?;

    debug!(id = row.id, delta = entry.delta, "Appended stock log entry");
    row.try_into()
}

/// List every log entry, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<ItemLog>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, ItemLogRow>(
        r"
        SELECT id, item_id, action, delta, notes, created_at
        FROM item_logs
        ORDER BY created_at DESC, id DESC
        ",
    )
    .fetch_all(executor)
    .await?;

    collect_logs(rows)
}

/// List an item's log entries, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_item<'e, E>(
    executor: E,
    item_id: ItemId,
) -> Result<Vec<ItemLog>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, ItemLogRow>(
        r"
        SELECT id, item_id, action, delta, notes, created_at
        FROM item_logs
        WHERE item_id = $1
        ORDER BY created_at DESC, id DESC
        ",
    )
    .bind(item_id)
    .fetch_all(executor)
    .await?;

    collect_logs(rows)
}

/// Sum the signed deltas of an item's complete history.
///
/// For a consistent ledger this equals the item's current stock.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn sum_deltas<'e, E>(executor: E, item_id: ItemId) -> Result<i64, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sum = sqlx::query_scalar::<_, i64>(
        r"
        SELECT COALESCE(SUM(delta), 0)::BIGINT
        FROM item_logs
        WHERE item_id = $1
        ",
    )
    .bind(item_id)
    .fetch_one(executor)
    .await?;

    Ok(sum)
}

/// Most recent stock movements as activity entries, newest first.
///
/// Item-log activity is always attributed to "System".
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn recent_activity<'e, E>(
    executor: E,
    limit: i64,
) -> Result<Vec<ActivityEntry>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, ActivityRow>(
        r"
        SELECT l.id, l.action, i.name AS item_name, l.created_at
        FROM item_logs l
        JOIN items i ON i.id = l.item_id
        ORDER BY l.created_at DESC, l.id DESC
        LIMIT $1
        ",
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ActivityEntry {
            id: row.id,
            action: row.action,
            item_name: row.item_name,
            user: "System".to_string(),
            date: row.created_at,
            kind: ActivityKind::Item,
        })
        .collect())
}
