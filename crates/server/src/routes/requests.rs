//! Stock request workflow routes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use stockroom_core::{RequestId, RequestStatus};

use crate::error::AppError;
use crate::models::{
    ApiResponse, ApproveRequestInput, BulkRequestInput, CreateRequestInput, FulfillOutcome,
    FulfillRequestInput, Request, RequestDetails, RequestLog,
};
use crate::services::RequestService;
use crate::state::AppState;

/// Query parameters for the request listing.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Only return requests in this status.
    pub status: Option<RequestStatus>,
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
    /// Number of rows to skip.
    pub offset: Option<i64>,
}

/// List requests, newest first, optionally filtered by status and
/// paginated.
///
/// GET /api/requests?status=pending&limit=20&offset=0
///
/// # Errors
///
/// Returns `AppError` if the query fails.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ApiResponse<Vec<RequestDetails>>>, AppError> {
    let requests = RequestService::new(state.pool().clone())
        .list(query.status, query.limit, query.offset)
        .await?;
    Ok(Json(ApiResponse::ok("Requests retrieved successfully", requests)))
}

/// Fetch a request with its user and item names.
///
/// GET /api/requests/{id}
///
/// # Errors
///
/// Returns `AppError` if the request does not exist.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
) -> Result<Json<ApiResponse<RequestDetails>>, AppError> {
    let request = RequestService::new(state.pool().clone()).get(id).await?;
    Ok(Json(ApiResponse::ok("Request retrieved successfully", request)))
}

/// Create a pending request.
///
/// POST /api/requests
///
/// # Errors
///
/// Returns `AppError` if the user or item is missing, or the quantity is
/// not positive.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRequestInput>,
) -> Result<(StatusCode, Json<ApiResponse<Request>>), AppError> {
    let request = RequestService::new(state.pool().clone()).create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Request created successfully", request)),
    ))
}

/// Approve or reject a pending request.
///
/// PUT /api/requests/{id}/approve
///
/// # Errors
///
/// Returns `AppError` if the request does not exist or is not pending.
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
    Json(input): Json<ApproveRequestInput>,
) -> Result<Json<ApiResponse<Request>>, AppError> {
    let message = if input.approve {
        "Request approved successfully"
    } else {
        "Request rejected successfully"
    };
    let request = RequestService::new(state.pool().clone()).approve(id, input).await?;
    Ok(Json(ApiResponse::ok(message, request)))
}

/// Fulfil an approved request, withdrawing its stock.
///
/// PUT /api/requests/{id}/fulfill
///
/// The body is optional; an empty one records the fulfilment against
/// "System" with a derived note.
///
/// # Errors
///
/// Returns `AppError` if the request is missing or not approved, or the
/// item no longer has the quantity on hand.
pub async fn fulfill(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
    input: Option<Json<FulfillRequestInput>>,
) -> Result<Json<ApiResponse<FulfillOutcome>>, AppError> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let outcome = RequestService::new(state.pool().clone()).fulfill(id, input).await?;
    Ok(Json(ApiResponse::ok("Request fulfilled successfully", outcome)))
}

/// Approve a batch of pending requests, all or nothing.
///
/// PUT /api/requests/bulk/approve
///
/// # Errors
///
/// Returns `AppError` if any request is missing or not pending; no
/// request changes in that case.
pub async fn bulk_approve(
    State(state): State<AppState>,
    Json(input): Json<BulkRequestInput>,
) -> Result<Json<ApiResponse<Vec<Request>>>, AppError> {
    let requests = RequestService::new(state.pool().clone()).bulk_approve(input).await?;
    Ok(Json(ApiResponse::ok("Requests approved successfully", requests)))
}

/// Reject a batch of pending requests, all or nothing.
///
/// PUT /api/requests/bulk/reject
///
/// # Errors
///
/// Returns `AppError` if any request is missing or not pending; no
/// request changes in that case.
pub async fn bulk_reject(
    State(state): State<AppState>,
    Json(input): Json<BulkRequestInput>,
) -> Result<Json<ApiResponse<Vec<Request>>>, AppError> {
    let requests = RequestService::new(state.pool().clone()).bulk_reject(input).await?;
    Ok(Json(ApiResponse::ok("Requests rejected successfully", requests)))
}

/// A request's workflow history, oldest first.
///
/// GET /api/requests/{id}/logs
///
/// # Errors
///
/// Returns `AppError` if the request does not exist.
pub async fn logs(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
) -> Result<Json<ApiResponse<Vec<RequestLog>>>, AppError> {
    let logs = RequestService::new(state.pool().clone()).logs(id).await?;
    Ok(Json(ApiResponse::ok("Logs retrieved successfully", logs)))
}
