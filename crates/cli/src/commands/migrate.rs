//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! stockroom-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOCKROOM_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL`
//!   connection string
//!
//! Migration files live in `crates/server/migrations/` and are embedded
//! into the binary at compile time, so the command runs from anywhere.

use secrecy::SecretString;
use tracing::info;

use stockroom_server::db;

/// Errors from the migrate command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run pending database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is not set, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOCKROOM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("STOCKROOM_DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
