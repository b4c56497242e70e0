//! Dashboard routes.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::models::{ApiResponse, DashboardStats};
use crate::services::DashboardService;
use crate::state::AppState;

/// Aggregated counts, low stock, and recent activity.
///
/// GET /api/dashboard/stats
///
/// # Errors
///
/// Returns `AppError` if any query fails.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = DashboardService::new(state.pool().clone()).stats().await?;
    Ok(Json(ApiResponse::ok("Dashboard stats retrieved successfully", stats)))
}
