//! Integration tests for series allocation.
//!
//! These run against a real `PostgreSQL` database and are skipped silently
//! when `STOCKROOM_TEST_DATABASE_URL` is not set. Series ranges are scoped
//! per item and every fixture item is unique, so parallel runs do not
//! collide on the overlap checks.

#![allow(clippy::unwrap_used)]

use stockroom_core::{ItemId, SeriesKind, StockAction};
use stockroom_integration_tests::{try_test_pool, unique};
use stockroom_server::db;
use stockroom_server::models::{
    CreateItemInput, CreateSeriesInput, Item, SeriesEndpoint, StockAdjustmentInput,
};
use stockroom_server::services::{Entity, LedgerError, LedgerService, SeriesService};

async fn create_item(service: &LedgerService, stock: i64) -> Item {
    service
        .create_item(CreateItemInput {
            name: unique("serialized"),
            category: Some("integration".to_string()),
            unit: Some("pcs".to_string()),
            description: None,
            stock: Some(stock),
        })
        .await
        .unwrap()
}

fn series_input(item_id: ItemId, from: &str, to: &str, kind: SeriesKind) -> CreateSeriesInput {
    CreateSeriesInput {
        item_id,
        from: SeriesEndpoint::Text(from.to_string()),
        to: SeriesEndpoint::Text(to.to_string()),
        quantity: None,
        kind,
    }
}

// =============================================================================
// Allocation
// =============================================================================

#[tokio::test]
async fn test_deposit_series_pads_labels_and_adds_stock() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool.clone());
    let item = create_item(&ledger, 0).await;

    let created = series
        .create(series_input(item.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();
    assert_eq!(created.series.from, "00001");
    assert_eq!(created.series.to, "00010");
    assert_eq!(created.series.quantity, 10);
    assert_eq!(created.series.kind, SeriesKind::Deposit);
    assert_eq!(created.item.stock, 10);

    let logs = ledger.logs_for_item(item.id).await.unwrap();
    assert_eq!(logs[0].action, StockAction::Deposit);
    assert_eq!(logs[0].delta, 10);
    assert_eq!(logs[0].notes.as_deref(), Some("Deposited series 00001–00010"));

    let sum = db::item_logs::sum_deltas(&pool, item.id).await.unwrap();
    assert_eq!(sum, created.item.stock);
}

#[tokio::test]
async fn test_numeric_and_messy_bounds_normalize() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let item = create_item(&ledger, 0).await;

    // Numeric bounds
    let created = series
        .create(CreateSeriesInput {
            item_id: item.id,
            from: SeriesEndpoint::Number(7),
            to: SeriesEndpoint::Number(9),
            quantity: None,
            kind: SeriesKind::Deposit,
        })
        .await
        .unwrap();
    assert_eq!(created.series.from, "00007");
    assert_eq!(created.series.to, "00009");
    assert_eq!(created.series.quantity, 3);

    // Bounds with non-digit noise keep only their digits
    let created = series
        .create(series_input(item.id, "A-17", "A-20", SeriesKind::Deposit))
        .await
        .unwrap();
    assert_eq!(created.series.from, "00017");
    assert_eq!(created.series.to, "00020");
    assert_eq!(created.item.stock, 7);
}

#[tokio::test]
async fn test_quantity_must_match_range_size() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let item = create_item(&ledger, 0).await;

    let err = series
        .create(CreateSeriesInput {
            item_id: item.id,
            from: SeriesEndpoint::Text("1".to_string()),
            to: SeriesEndpoint::Text("10".to_string()),
            quantity: Some(5),
            kind: SeriesKind::Deposit,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidValue(msg) if msg == "quantity 5 does not match range size 10"
    ));

    // A matching explicit quantity is accepted
    let created = series
        .create(CreateSeriesInput {
            item_id: item.id,
            from: SeriesEndpoint::Text("1".to_string()),
            to: SeriesEndpoint::Text("10".to_string()),
            quantity: Some(10),
            kind: SeriesKind::Deposit,
        })
        .await
        .unwrap();
    assert_eq!(created.series.quantity, 10);
}

// =============================================================================
// Overlap Detection
// =============================================================================

#[tokio::test]
async fn test_overlapping_ranges_rejected() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let item = create_item(&ledger, 0).await;

    series
        .create(series_input(item.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();

    // Straddling the existing upper bound
    let err = series
        .create(series_input(item.id, "5", "15", SeriesKind::Deposit))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::OverlapDetected { range } if range == "00005–00015"
    ));

    // Touching at a single value still counts
    let err = series
        .create(series_input(item.id, "10", "12", SeriesKind::Deposit))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::OverlapDetected { .. }));

    // Adjacent but disjoint is fine
    series
        .create(series_input(item.id, "11", "20", SeriesKind::Deposit))
        .await
        .unwrap();

    let allocated = series.list_for_item(item.id).await.unwrap();
    assert_eq!(allocated.len(), 2);
}

#[tokio::test]
async fn test_overlap_is_scoped_per_item() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let first = create_item(&ledger, 0).await;
    let second = create_item(&ledger, 0).await;

    series
        .create(series_input(first.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();
    // The same range on a different item does not conflict
    series
        .create(series_input(second.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();
}

// =============================================================================
// Withdraw Series
// =============================================================================

#[tokio::test]
async fn test_withdraw_series_requires_stock() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let item = create_item(&ledger, 5).await;

    let err = series
        .create(series_input(item.id, "1", "10", SeriesKind::Withdraw))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientStock {
            requested: 10,
            available: 5,
        }
    ));

    // Nothing was allocated or moved
    assert!(series.list_for_item(item.id).await.unwrap().is_empty());
    assert_eq!(ledger.get_item(item.id).await.unwrap().stock, 5);

    let created = series
        .create(series_input(item.id, "1", "5", SeriesKind::Withdraw))
        .await
        .unwrap();
    assert_eq!(created.item.stock, 0);

    let logs = ledger.logs_for_item(item.id).await.unwrap();
    assert_eq!(logs[0].action, StockAction::Withdraw);
    assert_eq!(logs[0].delta, -5);
    assert_eq!(logs[0].notes.as_deref(), Some("Withdrew series 00001–00005"));
}

// =============================================================================
// Deletion and Reversal
// =============================================================================

#[tokio::test]
async fn test_delete_series_reverses_stock_effect() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool.clone());
    let item = create_item(&ledger, 0).await;

    let deposited = series
        .create(series_input(item.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();
    let withdrawn = series
        .create(series_input(item.id, "11", "15", SeriesKind::Withdraw))
        .await
        .unwrap();
    assert_eq!(withdrawn.item.stock, 5);

    // Deleting a withdraw series puts its quantity back
    let item_after = series.delete(withdrawn.series.id).await.unwrap();
    assert_eq!(item_after.stock, 10);

    // Deleting a deposit series takes its quantity away again
    let item_after = series.delete(deposited.series.id).await.unwrap();
    assert_eq!(item_after.stock, 0);

    // The original allocation entries survive alongside the reversals
    let logs = ledger.logs_for_item(item.id).await.unwrap();
    assert_eq!(logs.len(), 5);
    assert_eq!(logs[0].action, StockAction::DeleteSeries);
    assert_eq!(logs[0].delta, -10);
    assert_eq!(logs[0].notes.as_deref(), Some("Removed series 00001–00010"));
    assert_eq!(logs[1].action, StockAction::DeleteSeries);
    assert_eq!(logs[1].delta, 5);
    assert_eq!(logs[1].notes.as_deref(), Some("Removed series 00011–00015"));
    assert!(
        logs.iter()
            .any(|log| log.notes.as_deref() == Some("Deposited series 00001–00010"))
    );

    assert!(series.list_for_item(item.id).await.unwrap().is_empty());
    let sum = db::item_logs::sum_deltas(&pool, item.id).await.unwrap();
    assert_eq!(sum, 0);

    // The range is free for reallocation now
    series
        .create(series_input(item.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_deposit_series_fails_when_stock_spent() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let item = create_item(&ledger, 0).await;

    let created = series
        .create(series_input(item.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();
    ledger
        .withdraw(item.id, StockAdjustmentInput { quantity: 8, notes: None })
        .await
        .unwrap();

    let err = series.delete(created.series.id).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientStock {
            requested: 10,
            available: 2,
        }
    ));

    // The series row is still there and stock is unchanged
    assert_eq!(series.list_for_item(item.id).await.unwrap().len(), 1);
    assert_eq!(ledger.get_item(item.id).await.unwrap().stock, 2);
}

#[tokio::test]
async fn test_delete_unknown_series_not_found() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let item = create_item(&ledger, 0).await;

    let created = series
        .create(series_input(item.id, "1", "3", SeriesKind::Deposit))
        .await
        .unwrap();
    series.delete(created.series.id).await.unwrap();

    let err = series.delete(created.series.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(Entity::Series)));
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn test_series_listings_order() {
    let Some(pool) = try_test_pool().await else {
        return;
    };
    let ledger = LedgerService::new(pool.clone());
    let series = SeriesService::new(pool);
    let item = create_item(&ledger, 0).await;

    // Created out of range order on purpose
    let high = series
        .create(series_input(item.id, "11", "20", SeriesKind::Deposit))
        .await
        .unwrap();
    let low = series
        .create(series_input(item.id, "1", "10", SeriesKind::Deposit))
        .await
        .unwrap();

    // Per-item listing is ascending by range start
    let for_item = series.list_for_item(item.id).await.unwrap();
    assert_eq!(for_item.len(), 2);
    assert_eq!(for_item[0].id, low.series.id);
    assert_eq!(for_item[1].id, high.series.id);

    // The global listing is newest first
    let all: Vec<_> = series
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|entry| entry.item_id == item.id)
        .collect();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, low.series.id);
    assert_eq!(all[1].id, high.series.id);
}
