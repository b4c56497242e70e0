//! Integration tests for Stockroom.
//!
//! # Running Tests
//!
//! ```bash
//! # Logic and router tests run everywhere
//! cargo test -p stockroom-integration-tests
//!
//! # Database scenarios additionally need a live PostgreSQL
//! STOCKROOM_TEST_DATABASE_URL=postgres://localhost/stockroom_test \
//!     cargo test -p stockroom-integration-tests
//! ```
//!
//! Database-backed tests skip silently when
//! `STOCKROOM_TEST_DATABASE_URL` is not set, so the default test run
//! stays green without infrastructure.
//!
//! # Test Categories
//!
//! - `status_transitions` - Workflow state machine and text round-trips
//! - `router_smoke` - Route shape and rejection behavior, no database
//! - `ledger_stock` - Item lifecycle and stock conservation
//! - `series_allocation` - Series ranges, overlap, and reversal
//! - `request_workflow` - Request decisions, fulfilment, bulk operations

use std::net::{IpAddr, Ipv4Addr};

use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use stockroom_server::config::ServerConfig;
use stockroom_server::state::AppState;

/// Connect to the database named by `STOCKROOM_TEST_DATABASE_URL` and
/// bring its schema up to date.
///
/// Returns `None` when the variable is unset or the database is
/// unreachable, letting database-backed tests skip.
pub async fn try_test_pool() -> Option<PgPool> {
    let url = std::env::var("STOCKROOM_TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .ok()?;
    sqlx::migrate!("../server/migrations").run(&pool).await.ok()?;
    Some(pool)
}

/// Application state backed by a lazy pool that never connects.
///
/// Good enough for router tests whose requests are rejected before any
/// handler touches the database.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn lazy_state() -> AppState {
    let config = ServerConfig {
        database_url: SecretString::from("postgres://localhost/stockroom_unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_json: false,
    };
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/stockroom_unused")
        .expect("static database url must parse");
    AppState::new(config, pool)
}

/// A unique label for test fixtures so parallel tests don't collide.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}
