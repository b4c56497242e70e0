//! Stock movement log routes.

use axum::{
    Json,
    extract::{Path, State},
};

use stockroom_core::ItemId;

use crate::error::AppError;
use crate::models::{ApiResponse, ItemLog};
use crate::services::LedgerService;
use crate::state::AppState;

/// List every stock log entry, newest first.
///
/// GET /api/logs
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ItemLog>>>, AppError> {
    let logs = LedgerService::new(state.pool().clone()).list_logs().await?;
    Ok(Json(ApiResponse::ok("Logs retrieved successfully", logs)))
}

/// List an active item's stock log entries, newest first.
///
/// GET /api/logs/{item_id}
///
/// # Errors
///
/// Returns `AppError` if the item does not exist or has been deleted.
pub async fn by_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<ApiResponse<Vec<ItemLog>>>, AppError> {
    let logs = LedgerService::new(state.pool().clone()).logs_for_item(item_id).await?;
    Ok(Json(ApiResponse::ok("Logs retrieved successfully", logs)))
}
