//! Unified error handling for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ApiResponse;
use crate::services::LedgerError;

/// Application-level error type for API handlers.
///
/// Failures render as the standard response envelope with `success:
/// false` and the error's message as `message`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Service operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Self::Ledger(err) = self;

        let status = match &err {
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::InvalidRange(_)
            | LedgerError::InsufficientStock { .. }
            | LedgerError::InvalidState { .. }
            | LedgerError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            LedgerError::OverlapDetected { .. } => StatusCode::CONFLICT,
            LedgerError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose storage details to clients
        let message = if matches!(err, LedgerError::Repository(_)) {
            tracing::error!(error = %err, "Request failed");
            "Internal server error".to_string()
        } else {
            err.to_string()
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
