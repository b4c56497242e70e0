//! Item registry and stock adjustment routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use stockroom_core::ItemId;

use crate::error::AppError;
use crate::models::{
    ApiResponse, CreateItemInput, Item, ItemLog, SetStockInput, StockAdjustmentInput,
    UpdateItemInput,
};
use crate::services::LedgerService;
use crate::state::AppState;

/// List all active items, newest first.
///
/// GET /api/items
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Item>>>, AppError> {
    let items = LedgerService::new(state.pool().clone()).list_items().await?;
    Ok(Json(ApiResponse::ok("Items retrieved successfully", items)))
}

/// Fetch a single active item.
///
/// GET /api/items/{id}
///
/// # Errors
///
/// Returns `AppError` if the item does not exist or has been deleted.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let item = LedgerService::new(state.pool().clone()).get_item(id).await?;
    Ok(Json(ApiResponse::ok("Item retrieved successfully", item)))
}

/// List active items in a category.
///
/// GET /api/items/category/{category}
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<Item>>>, AppError> {
    let items = LedgerService::new(state.pool().clone())
        .list_items_by_category(&category)
        .await?;
    Ok(Json(ApiResponse::ok("Items retrieved successfully", items)))
}

/// Create an item.
///
/// POST /api/items
///
/// # Errors
///
/// Returns `AppError` for an empty name or negative initial stock.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> Result<(StatusCode, Json<ApiResponse<Item>>), AppError> {
    let item = LedgerService::new(state.pool().clone()).create_item(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Item created successfully", item)),
    ))
}

/// Update an item's fields, and optionally its stock.
///
/// PUT /api/items/{id}
///
/// # Errors
///
/// Returns `AppError` if the item is missing or the stock is negative.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(input): Json<UpdateItemInput>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let item = LedgerService::new(state.pool().clone()).update_item(id, input).await?;
    Ok(Json(ApiResponse::ok("Item updated successfully", item)))
}

/// Soft-delete an item.
///
/// DELETE /api/items/{id}
///
/// # Errors
///
/// Returns `AppError` if the item does not exist or was already deleted.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let item = LedgerService::new(state.pool().clone()).delete_item(id).await?;
    Ok(Json(ApiResponse::ok("Item deleted successfully", item)))
}

/// Add stock to an item.
///
/// POST /api/items/{id}/deposit
///
/// # Errors
///
/// Returns `AppError` if the item is missing or the quantity is not
/// positive.
pub async fn deposit(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(input): Json<StockAdjustmentInput>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let quantity = input.quantity;
    let item = LedgerService::new(state.pool().clone()).deposit(id, input).await?;
    Ok(Json(ApiResponse::ok(
        format!("Deposited {quantity} successfully"),
        item,
    )))
}

/// Remove stock from an item.
///
/// POST /api/items/{id}/withdraw
///
/// # Errors
///
/// Returns `AppError` if the item is missing, the quantity is not
/// positive, or stock would go negative.
pub async fn withdraw(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(input): Json<StockAdjustmentInput>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let quantity = input.quantity;
    let item = LedgerService::new(state.pool().clone()).withdraw(id, input).await?;
    Ok(Json(ApiResponse::ok(
        format!("Withdrew {quantity} successfully"),
        item,
    )))
}

/// Set an item's stock to an absolute value.
///
/// PUT /api/items/{id}/stock
///
/// # Errors
///
/// Returns `AppError` if the item is missing or the value is negative.
pub async fn set_stock(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(input): Json<SetStockInput>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let item = LedgerService::new(state.pool().clone()).set_stock(id, input).await?;
    Ok(Json(ApiResponse::ok("Stock updated successfully", item)))
}

/// An active item's stock movements, newest first.
///
/// GET /api/items/{id}/logs
///
/// # Errors
///
/// Returns `AppError` if the item does not exist or has been deleted.
pub async fn logs(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<ApiResponse<Vec<ItemLog>>>, AppError> {
    let logs = LedgerService::new(state.pool().clone()).logs_for_item(id).await?;
    Ok(Json(ApiResponse::ok("Logs retrieved successfully", logs)))
}
