//! Database operations for users.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};

use stockroom_core::UserId;

use super::RepositoryError;
use crate::models::user::User;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Get a user by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find<'e, E>(executor: E, id: UserId) -> Result<Option<User>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, UserRow>(
        r"
        SELECT id, name, email, created_at, updated_at
        FROM users
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Into::into))
}

/// Insert a user, or update the name if the email already exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn upsert<'e, E>(executor: E, name: &str, email: &str) -> Result<User, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, UserRow>(
        r"
        INSERT INTO users (name, email)
        VALUES ($1, $2)
        ON CONFLICT ON CONSTRAINT users_email_unique
        DO UPDATE SET name = EXCLUDED.name, updated_at = NOW()
        RETURNING id, name, email, created_at, updated_at
        ",
    )
    .bind(name)
    .bind(email)
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}
