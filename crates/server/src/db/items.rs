//! Database operations for inventory items.
//!
//! Every read filters on `state = 'active'`; soft-deleted rows are only
//! reachable through the log tables that reference them.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};

use stockroom_core::ItemId;

use super::RepositoryError;
use crate::models::dashboard::LowStockItem;
use crate::models::item::{Item, NewItem, UpdateItemInput};

/// Internal row type for item queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i32,
    name: String,
    category: Option<String>,
    unit: Option<String>,
    description: Option<String>,
    stock: i64,
    state: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let state = row.state.parse().map_err(RepositoryError::DataCorruption)?;
        Ok(Self {
            id: ItemId::new(row.id),
            name: row.name,
            category: row.category,
            unit: row.unit,
            description: row.description,
            stock: row.stock,
            state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for the low-stock projection.
#[derive(Debug, sqlx::FromRow)]
struct LowStockRow {
    id: i32,
    name: String,
    stock: i64,
    category: Option<String>,
}

impl From<LowStockRow> for LowStockItem {
    fn from(row: LowStockRow) -> Self {
        Self {
            id: ItemId::new(row.id),
            name: row.name,
            stock: row.stock,
            category: row.category,
        }
    }
}

fn collect_items(rows: Vec<ItemRow>) -> Result<Vec<Item>, RepositoryError> {
    rows.into_iter().map(Item::try_from).collect()
}

/// Insert a new item.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert<'e, E>(executor: E, item: &NewItem) -> Result<Item, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ItemRow>(
        r"
        INSERT INTO items (name, category, unit, description, stock)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, category, unit, description, stock, state, created_at, updated_at
        ",
    )
    .bind(&item.name)
    .bind(&item.category)
    .bind(&item.unit)
    .bind(&item.description)
    .bind(item.stock)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

/// Get an active item by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_active<'e, E>(executor: E, id: ItemId) -> Result<Option<Item>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ItemRow>(
        r"
        SELECT id, name, category, unit, description, stock, state, created_at, updated_at
        FROM items
        WHERE id = $1 AND state = 'active'
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Item::try_from).transpose()
}

/// Get an active item by ID, locking its row for the current transaction.
///
/// Serializes concurrent stock mutations and overlap checks per item.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_active_for_update<'e, E>(
    executor: E,
    id: ItemId,
) -> Result<Option<Item>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ItemRow>(
        r"
        SELECT id, name, category, unit, description, stock, state, created_at, updated_at
        FROM items
        WHERE id = $1 AND state = 'active'
        FOR UPDATE
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Item::try_from).transpose()
}

/// List active items, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_active<'e, E>(executor: E) -> Result<Vec<Item>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, ItemRow>(
        r"
        SELECT id, name, category, unit, description, stock, state, created_at, updated_at
        FROM items
        WHERE state = 'active'
        ORDER BY created_at DESC, id DESC
        ",
    )
    .fetch_all(executor)
    .await?;

    collect_items(rows)
}

/// List active items in a category, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_active_by_category<'e, E>(
    executor: E,
    category: &str,
) -> Result<Vec<Item>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, ItemRow>(
        r"
        SELECT id, name, category, unit, description, stock, state, created_at, updated_at
        FROM items
        WHERE state = 'active' AND category = $1
        ORDER BY created_at DESC, id DESC
        ",
    )
    .bind(category)
    .fetch_all(executor)
    .await?;

    collect_items(rows)
}

/// Update an item's descriptive fields; absent fields keep their values.
///
/// Stock is deliberately not touched here. Stock changes go through
/// [`set_stock`] so they always pair with a log entry.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the item doesn't exist or is deleted.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_fields<'e, E>(
    executor: E,
    id: ItemId,
    input: &UpdateItemInput,
) -> Result<Item, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ItemRow>(
        r"
        UPDATE items
        SET
            name = COALESCE($2, name),
            category = COALESCE($3, category),
            unit = COALESCE($4, unit),
            description = COALESCE($5, description),
            updated_at = NOW()
        WHERE id = $1 AND state = 'active'
        RETURNING id, name, category, unit, description, stock, state, created_at, updated_at
        ",
    )
    .bind(id)
    .bind(&input.name)
    .bind(&input.category)
    .bind(&input.unit)
    .bind(&input.description)
    .fetch_optional(executor)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}

/// Set an item's stock to an absolute value.
///
/// Callers must hold the item's row lock and have validated the value;
/// this is the only statement that writes `items.stock`.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the item doesn't exist or is deleted.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn set_stock<'e, E>(executor: E, id: ItemId, stock: i64) -> Result<Item, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ItemRow>(
        r"
        UPDATE items
        SET stock = $2, updated_at = NOW()
        WHERE id = $1 AND state = 'active'
        RETURNING id, name, category, unit, description, stock, state, created_at, updated_at
        ",
    )
    .bind(id)
    .bind(stock)
    .fetch_optional(executor)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}

/// Soft-delete an active item.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the item doesn't exist or is
/// already deleted.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn soft_delete<'e, E>(executor: E, id: ItemId) -> Result<Item, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, ItemRow>(
        r"
        UPDATE items
        SET state = 'deleted', updated_at = NOW()
        WHERE id = $1 AND state = 'active'
        RETURNING id, name, category, unit, description, stock, state, created_at, updated_at
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}

/// Count active items.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_active<'e, E>(executor: E) -> Result<i64, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE state = 'active'")
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// List active items with stock below `threshold`, lowest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_low_stock<'e, E>(
    executor: E,
    threshold: i64,
) -> Result<Vec<LowStockItem>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, LowStockRow>(
        r"
        SELECT id, name, stock, category
        FROM items
        WHERE state = 'active' AND stock < $1
        ORDER BY stock ASC, id ASC
        ",
    )
    .bind(threshold)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}
