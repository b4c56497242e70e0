//! HTTP route handlers for the stock ledger API.
//!
//! # Route Structure
//!
//! ```text
//! # Items
//! GET    /api/items                      - List active items
//! GET    /api/items/{id}                 - Item detail
//! GET    /api/items/category/{category}  - Items in a category
//! POST   /api/items                      - Create item
//! PUT    /api/items/{id}                 - Update item fields
//! DELETE /api/items/{id}                 - Soft-delete item
//! POST   /api/items/{id}/deposit         - Add stock
//! POST   /api/items/{id}/withdraw        - Remove stock
//! PUT    /api/items/{id}/stock           - Set stock to an absolute value
//! GET    /api/items/{id}/logs            - Stock movements for an item
//!
//! # Series
//! GET    /api/series                     - List all series
//! GET    /api/series/item/{item_id}      - Series for an item
//! POST   /api/series                     - Allocate a series range
//! DELETE /api/series/{id}                - Delete a series, reversing its stock
//!
//! # Requests
//! GET    /api/requests                   - List requests (?status=&limit=&offset=)
//! GET    /api/requests/{id}              - Request detail
//! POST   /api/requests                   - Create a pending request
//! PUT    /api/requests/{id}/approve      - Approve or reject
//! PUT    /api/requests/{id}/fulfill      - Fulfil an approved request
//! PUT    /api/requests/bulk/approve      - Approve a batch, all or nothing
//! PUT    /api/requests/bulk/reject       - Reject a batch, all or nothing
//! GET    /api/requests/{id}/logs         - Workflow history
//!
//! # Logs
//! GET    /api/logs                       - All stock movements
//! GET    /api/logs/{item_id}             - Stock movements for an item
//!
//! # Dashboard
//! GET    /api/dashboard/stats            - Aggregated stats
//! ```
//!
//! Every response uses the `{success, message, data?}` envelope.

pub mod dashboard;
pub mod items;
pub mod logs;
pub mod requests;
pub mod series;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(items::list).post(items::create))
        .route(
            "/items/{id}",
            get(items::detail).put(items::update).delete(items::remove),
        )
        .route("/items/category/{category}", get(items::by_category))
        .route("/items/{id}/deposit", post(items::deposit))
        .route("/items/{id}/withdraw", post(items::withdraw))
        .route("/items/{id}/stock", put(items::set_stock))
        .route("/items/{id}/logs", get(items::logs))
}

/// Create the series routes router.
pub fn series_routes() -> Router<AppState> {
    Router::new()
        .route("/series", get(series::list).post(series::create))
        .route("/series/{id}", delete(series::remove))
        .route("/series/item/{item_id}", get(series::by_item))
}

/// Create the request routes router.
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(requests::list).post(requests::create))
        .route("/requests/{id}", get(requests::detail))
        .route("/requests/{id}/approve", put(requests::approve))
        .route("/requests/{id}/fulfill", put(requests::fulfill))
        .route("/requests/{id}/logs", get(requests::logs))
        .route("/requests/bulk/approve", put(requests::bulk_approve))
        .route("/requests/bulk/reject", put(requests::bulk_reject))
}

/// Create the log routes router.
pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(logs::list))
        .route("/logs/{item_id}", get(logs::by_item))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(dashboard::stats))
}

/// Create the combined router for everything under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(item_routes())
        .merge(series_routes())
        .merge(request_routes())
        .merge(log_routes())
        .merge(dashboard_routes())
}
