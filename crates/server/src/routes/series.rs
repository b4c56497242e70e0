//! Series allocation routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use stockroom_core::{ItemId, SeriesId};

use crate::error::AppError;
use crate::models::{ApiResponse, CreateSeriesInput, Item, Series, SeriesWithItem};
use crate::services::SeriesService;
use crate::state::AppState;

/// List every series, newest first.
///
/// GET /api/series
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Series>>>, AppError> {
    let series = SeriesService::new(state.pool().clone()).list_all().await?;
    Ok(Json(ApiResponse::ok("Series retrieved successfully", series)))
}

/// List an item's series in ascending range order.
///
/// GET /api/series/item/{item_id}
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn by_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<ApiResponse<Vec<Series>>>, AppError> {
    let series = SeriesService::new(state.pool().clone())
        .list_for_item(item_id)
        .await?;
    Ok(Json(ApiResponse::ok("Series retrieved successfully", series)))
}

/// Allocate a series range against an item.
///
/// POST /api/series
///
/// # Errors
///
/// Returns `AppError` for an invalid or overlapping range, a missing
/// item, or insufficient stock on a withdraw series.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSeriesInput>,
) -> Result<(StatusCode, Json<ApiResponse<SeriesWithItem>>), AppError> {
    let kind = input.kind;
    let created = SeriesService::new(state.pool().clone()).create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(format!("Series {kind} successful"), created)),
    ))
}

/// Delete a series, reversing its stock effect.
///
/// DELETE /api/series/{id}
///
/// # Errors
///
/// Returns `AppError` if the series or its item is missing, or if
/// reversing a deposit would take stock negative.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<SeriesId>,
) -> Result<Json<ApiResponse<Item>>, AppError> {
    let item = SeriesService::new(state.pool().clone()).delete(id).await?;
    Ok(Json(ApiResponse::ok("Series deleted successfully", item)))
}
