//! Seed the database with a default user.
//!
//! Every stock request references a requesting user, and a fresh install
//! has none. This command upserts a well-known user so the workflow can
//! be exercised immediately after `migrate`.

use secrecy::SecretString;
use tracing::info;

use stockroom_server::db;

/// Name of the seeded default user.
const DEFAULT_NAME: &str = "Test User";

/// Email of the seeded default user. The upsert keys on this.
const DEFAULT_EMAIL: &str = "test@example.com";

/// Upsert the default user.
///
/// # Errors
///
/// Returns an error if the database URL is not set or the upsert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOCKROOM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "STOCKROOM_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;

    let user = db::users::upsert(&pool, DEFAULT_NAME, DEFAULT_EMAIL).await?;
    info!(id = %user.id, email = DEFAULT_EMAIL, "Seeded default user");

    Ok(())
}
