//! Database operations for the stockroom `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `users` - Requesters referenced by stock requests
//! - `items` - Inventory items (soft-deleted via `state`)
//! - `series` - Serial-number ranges with a gist overlap backstop
//! - `item_logs` - Append-only signed stock movements
//! - `requests` / `request_logs` - Workflow state and history
//!
//! Repository functions are generic over the executor so the same query
//! runs against the pool or inside a service-owned transaction. All
//! queries use the runtime API; enum-typed columns are stored as `TEXT`
//! and parsed when rows convert into domain models.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p stockroom-cli -- migrate
//! ```

pub mod item_logs;
pub mod items;
pub mod requests;
pub mod series;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., overlapping series range).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
