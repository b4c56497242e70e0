//! Serial-number range allocation against item stock.
//!
//! A series reserves an inclusive numeric range (e.g. "00001" to "00010")
//! for an item and moves the matching quantity of stock in the same
//! transaction. Ranges for one item must never intersect; the overlap
//! check runs under the item's row lock and is backstopped by an
//! exclusion constraint.

use sqlx::PgPool;
use tracing::{info, instrument};

use stockroom_core::{ItemId, SeriesId, SeriesKind, SeriesRange, StockAction};

use crate::db::{self, RepositoryError};
use crate::models::{CreateSeriesInput, Item, NewSeries, Series, SeriesWithItem};
use crate::services::ledger::{Entity, LedgerError, apply_stock_delta};

/// Series allocation service.
pub struct SeriesService {
    pool: PgPool,
}

impl SeriesService {
    /// Create a new series service.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocate a series range and move the matching stock.
    ///
    /// Bounds arrive as strings or numbers and normalize to zero-padded
    /// labels compared numerically. A `deposit` series adds the range
    /// size to stock; a `withdraw` series removes it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRange`] for an inverted range,
    /// [`LedgerError::InvalidValue`] for unparseable bounds or a quantity
    /// that disagrees with the range size,
    /// [`LedgerError::OverlapDetected`] if the range intersects an
    /// existing series for the item, and
    /// [`LedgerError::InsufficientStock`] when a withdraw series exceeds
    /// the stock on hand.
    #[instrument(skip(self, input), fields(item_id = %input.item_id, kind = %input.kind))]
    pub async fn create(&self, input: CreateSeriesInput) -> Result<SeriesWithItem, LedgerError> {
        let range = SeriesRange::parse(&input.from.as_raw(), &input.to.as_raw())?;
        if let Some(quantity) = input.quantity
            && quantity != range.quantity()
        {
            return Err(LedgerError::InvalidValue(format!(
                "quantity {quantity} does not match range size {}",
                range.quantity()
            )));
        }
        let label = range.to_string();

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let item = db::items::find_active_for_update(&mut *tx, input.item_id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        if db::series::find_overlapping(
            &mut *tx,
            input.item_id,
            range.from_value(),
            range.to_value(),
        )
        .await?
        .is_some()
        {
            return Err(LedgerError::OverlapDetected { range: label });
        }

        let (delta, action, notes) = match input.kind {
            SeriesKind::Deposit => (
                range.quantity(),
                StockAction::Deposit,
                format!("Deposited series {label}"),
            ),
            SeriesKind::Withdraw => (
                -range.quantity(),
                StockAction::Withdraw,
                format!("Withdrew series {label}"),
            ),
        };
        let item = apply_stock_delta(&mut tx, &item, delta, action, notes).await?;

        let series = db::series::insert(
            &mut *tx,
            &NewSeries {
                item_id: input.item_id,
                range,
                kind: input.kind,
            },
        )
        .await
        .map_err(|err| match err {
            RepositoryError::Conflict(_) => LedgerError::OverlapDetected { range: label },
            other => LedgerError::Repository(other),
        })?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %series.id, range = %series_label(&series), "Created series");
        Ok(SeriesWithItem { series, item })
    }

    /// Delete a series and reverse its stock effect.
    ///
    /// The original allocation's log entry stays in place; the reversal
    /// appends its own `delete-series` entry. Removing a withdraw series
    /// re-adds its quantity; removing a deposit series withdraws it,
    /// which fails with [`LedgerError::InsufficientStock`] if the stock
    /// has since been spent.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the series or its item is
    /// missing.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SeriesId) -> Result<Item, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let series = db::series::find(&mut *tx, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Series))?;
        let item = db::items::find_active_for_update(&mut *tx, series.item_id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        // Re-checked under the item lock; a concurrent delete loses here.
        if !db::series::delete(&mut *tx, id).await? {
            return Err(LedgerError::NotFound(Entity::Series));
        }

        let delta = match series.kind {
            SeriesKind::Deposit => -series.quantity,
            SeriesKind::Withdraw => series.quantity,
        };
        let updated = apply_stock_delta(
            &mut tx,
            &item,
            delta,
            StockAction::DeleteSeries,
            format!("Removed series {}", series_label(&series)),
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %id, item_id = %updated.id, "Deleted series");
        Ok(updated)
    }

    /// List every series, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Repository`] if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Series>, LedgerError> {
        Ok(db::series::list_all(&self.pool).await?)
    }

    /// List an item's series in ascending range order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Repository`] if the query fails.
    pub async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Series>, LedgerError> {
        Ok(db::series::list_for_item(&self.pool, item_id).await?)
    }
}

fn series_label(series: &Series) -> String {
    format!("{}–{}", series.from, series.to)
}
