//! Database operations for series allocations.
//!
//! Overlap is checked in the service while holding the item's row lock;
//! the `series_no_overlap` exclusion constraint is the schema-level
//! backstop and maps to `RepositoryError::Conflict` here.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};

use stockroom_core::{ItemId, SeriesId};

use super::RepositoryError;
use crate::models::series::{NewSeries, Series};

/// Internal row type for series queries.
#[derive(Debug, sqlx::FromRow)]
struct SeriesRow {
    id: i32,
    item_id: i32,
    from_label: String,
    to_label: String,
    from_value: i64,
    to_value: i64,
    kind: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SeriesRow> for Series {
    type Error = RepositoryError;

    fn try_from(row: SeriesRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse().map_err(RepositoryError::DataCorruption)?;
        Ok(Self {
            id: SeriesId::new(row.id),
            item_id: ItemId::new(row.item_id),
            from: row.from_label,
            to: row.to_label,
            kind,
            quantity: row.to_value - row.from_value + 1,
            created_at: row.created_at,
        })
    }
}

fn collect_series(rows: Vec<SeriesRow>) -> Result<Vec<Series>, RepositoryError> {
    rows.into_iter().map(Series::try_from).collect()
}

/// Insert a new series.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the range overlaps an existing
/// series for the same item.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert<'e, E>(executor: E, series: &NewSeries) -> Result<Series, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, SeriesRow>(
        r"
        INSERT INTO series (item_id, from_label, to_label, from_value, to_value, kind)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, item_id, from_label, to_label, from_value, to_value, kind, created_at
        ",
    )
    .bind(series.item_id)
    .bind(series.range.from_label())
    .bind(series.range.to_label())
    .bind(series.range.from_value())
    .bind(series.range.to_value())
    .bind(series.kind.to_string())
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.constraint() == Some("series_no_overlap")
        {
            return RepositoryError::Conflict(
                "series range overlaps an existing series".to_string(),
            );
        }
        RepositoryError::Database(e)
    })?;

    row.try_into()
}

/// Get a series by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find<'e, E>(executor: E, id: SeriesId) -> Result<Option<Series>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, SeriesRow>(
        r"
        SELECT id, item_id, from_label, to_label, from_value, to_value, kind, created_at
        FROM series
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Series::try_from).transpose()
}

/// Find the first existing series for an item whose range intersects
/// `[from_value, to_value]`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_overlapping<'e, E>(
    executor: E,
    item_id: ItemId,
    from_value: i64,
    to_value: i64,
) -> Result<Option<Series>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, SeriesRow>(
        r"
        SELECT id, item_id, from_label, to_label, from_value, to_value, kind, created_at
        FROM series
        WHERE item_id = $1 AND to_value >= $2 AND from_value <= $3
        ORDER BY from_value ASC
        LIMIT 1
        ",
    )
    .bind(item_id)
    .bind(from_value)
    .bind(to_value)
    .fetch_optional(executor)
    .await?;

    row.map(Series::try_from).transpose()
}

/// List every series, newest allocation first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Series>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, SeriesRow>(
        r"
        SELECT id, item_id, from_label, to_label, from_value, to_value, kind, created_at
        FROM series
        ORDER BY id DESC
        ",
    )
    .fetch_all(executor)
    .await?;

    collect_series(rows)
}

/// List an item's series ordered by lower range bound.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_item<'e, E>(
    executor: E,
    item_id: ItemId,
) -> Result<Vec<Series>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, SeriesRow>(
        r"
        SELECT id, item_id, from_label, to_label, from_value, to_value, kind, created_at
        FROM series
        WHERE item_id = $1
        ORDER BY from_value ASC, id ASC
        ",
    )
    .bind(item_id)
    .fetch_all(executor)
    .await?;

    collect_series(rows)
}

/// Delete a series.
///
/// # Returns
///
/// Returns `true` if the series was deleted, `false` if it didn't exist.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete<'e, E>(executor: E, id: SeriesId) -> Result<bool, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query::<Postgres>(
        r"
        DELETE FROM series
        WHERE id = $1
        ",
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
