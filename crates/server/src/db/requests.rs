//! Database operations for stock requests and their audit log.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use tracing::debug;

use stockroom_core::{ItemId, RequestId, RequestLogId, RequestStatus, UserId};

use super::RepositoryError;
use crate::models::dashboard::{ActivityEntry, ActivityKind};
use crate::models::request::{
    NewRequest, NewRequestLog, Request, RequestDetails, RequestLog,
};

/// Internal row type for request queries.
#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: i32,
    user_id: i32,
    item_id: i32,
    quantity: i64,
    notes: Option<String>,
    status: String,
    approver: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for Request {
    type Error = RepositoryError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(RepositoryError::DataCorruption)?;
        Ok(Self {
            id: RequestId::new(row.id),
            user_id: UserId::new(row.user_id),
            item_id: ItemId::new(row.item_id),
            quantity: row.quantity,
            notes: row.notes,
            status,
            approver: row.approver,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for request queries joined with user and item names.
#[derive(Debug, sqlx::FromRow)]
struct RequestDetailsRow {
    id: i32,
    user_id: i32,
    item_id: i32,
    quantity: i64,
    notes: Option<String>,
    status: String,
    approver: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_name: String,
    item_name: String,
}

impl TryFrom<RequestDetailsRow> for RequestDetails {
    type Error = RepositoryError;

    fn try_from(row: RequestDetailsRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(RepositoryError::DataCorruption)?;
        Ok(Self {
            request: Request {
                id: RequestId::new(row.id),
                user_id: UserId::new(row.user_id),
                item_id: ItemId::new(row.item_id),
                quantity: row.quantity,
                notes: row.notes,
                status,
                approver: row.approver,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            user_name: row.user_name,
            item_name: row.item_name,
        })
    }
}

/// Internal row type for request log queries.
#[derive(Debug, sqlx::FromRow)]
struct RequestLogRow {
    id: i32,
    request_id: i32,
    action: String,
    actor: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RequestLogRow> for RequestLog {
    type Error = RepositoryError;

    fn try_from(row: RequestLogRow) -> Result<Self, Self::Error> {
        let action = row.action.parse().map_err(RepositoryError::DataCorruption)?;
        Ok(Self {
            id: RequestLogId::new(row.id),
            request_id: RequestId::new(row.request_id),
            action,
            actor: row.actor,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

fn collect_requests(rows: Vec<RequestRow>) -> Result<Vec<Request>, RepositoryError> {
    rows.into_iter().map(Request::try_from).collect()
}

/// Insert a new request in the `pending` state.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn insert<'e, E>(executor: E, request: &NewRequest) -> Result<Request, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RequestRow>(
        r"
        INSERT INTO requests (user_id, item_id, quantity, notes)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, item_id, quantity, notes, status, approver,
                  created_at, updated_at
        ",
    )
    .bind(request.user_id)
    .bind(request.item_id)
    .bind(request.quantity)
    .bind(&request.notes)
    .fetch_one(executor)
    .await?;

    debug!(id = row.id, "Inserted request");
    row.try_into()
}

/// Fetch a request by id.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find<'e, E>(
    executor: E,
    id: RequestId,
) -> Result<Option<Request>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RequestRow>(
        r"
        SELECT id, user_id, item_id, quantity, notes, status, approver,
               created_at, updated_at
        FROM requests
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Request::try_from).transpose()
}

/// Fetch a request by id, taking its row lock.
///
/// Serializes concurrent status transitions on the same request.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_for_update<'e, E>(
    executor: E,
    id: RequestId,
) -> Result<Option<Request>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RequestRow>(
        r"
        SELECT id, user_id, item_id, quantity, notes, status, approver,
               created_at, updated_at
        FROM requests
        WHERE id = $1
        FOR UPDATE
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(Request::try_from).transpose()
}

/// Fetch a request by id with the requesting user's and item's names.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_details<'e, E>(
    executor: E,
    id: RequestId,
) -> Result<Option<RequestDetails>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RequestDetailsRow>(
        r"
        SELECT r.id, r.user_id, r.item_id, r.quantity, r.notes, r.status,
               r.approver, r.created_at, r.updated_at,
               u.name AS user_name, i.name AS item_name
        FROM requests r
        JOIN users u ON u.id = r.user_id
        JOIN items i ON i.id = r.item_id
        WHERE r.id = $1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.map(RequestDetails::try_from).transpose()
}

/// List requests with user and item names, newest first, optionally
/// filtered by status and windowed by limit/offset.
///
/// A `NULL` limit or offset leaves that clause unconstrained.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list<'e, E>(
    executor: E,
    status: Option<RequestStatus>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<RequestDetails>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, RequestDetailsRow>(
        r"
        SELECT r.id, r.user_id, r.item_id, r.quantity, r.notes, r.status,
               r.approver, r.created_at, r.updated_at,
               u.name AS user_name, i.name AS item_name
        FROM requests r
        JOIN users u ON u.id = r.user_id
        JOIN items i ON i.id = r.item_id
        WHERE ($1::text IS NULL OR r.status = $1)
        ORDER BY r.created_at DESC, r.id DESC
        LIMIT $2 OFFSET $3
        ",
    )
    .bind(status.map(|s| s.to_string()))
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(RequestDetails::try_from).collect()
}

/// Lock a batch of requests by id, in ascending id order.
///
/// Locking in a stable order keeps concurrent bulk operations from
/// deadlocking against each other.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lock_many<'e, E>(
    executor: E,
    ids: &[i32],
) -> Result<Vec<Request>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, RequestRow>(
        r"
        SELECT id, user_id, item_id, quantity, notes, status, approver,
               created_at, updated_at
        FROM requests
        WHERE id = ANY($1)
        ORDER BY id
        FOR UPDATE
        ",
    )
    .bind(ids)
    .fetch_all(executor)
    .await?;

    collect_requests(rows)
}

/// Update a request's status, keeping the existing approver when none is
/// given.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the request does not exist, or
/// `RepositoryError::Database` if the query fails.
pub async fn set_status<'e, E>(
    executor: E,
    id: RequestId,
    status: RequestStatus,
    approver: Option<&str>,
) -> Result<Request, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RequestRow>(
        r"
        UPDATE requests
        SET status = $2, approver = COALESCE($3, approver), updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, item_id, quantity, notes, status, approver,
                  created_at, updated_at
        ",
    )
    .bind(id)
    .bind(status.to_string())
    .bind(approver)
    .fetch_optional(executor)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}

/// Update the status of a batch of requests in one statement.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn set_status_many<'e, E>(
    executor: E,
    ids: &[i32],
    status: RequestStatus,
    approver: &str,
) -> Result<Vec<Request>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, RequestRow>(
        r"
        UPDATE requests
        SET status = $2, approver = $3, updated_at = NOW()
        WHERE id = ANY($1)
        RETURNING id, user_id, item_id, quantity, notes, status, approver,
                  created_at, updated_at
        ",
    )
    .bind(ids)
    .bind(status.to_string())
    .bind(approver)
    .fetch_all(executor)
    .await?;

    collect_requests(rows)
}

/// Append a request log entry.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn append_log<'e, E>(
    executor: E,
    entry: &NewRequestLog,
) -> Result<RequestLog, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RequestLogRow>(
        r"
        INSERT INTO request_logs (request_id, action, actor, notes)
        VALUES ($1, $2, $3, $4)
        RETURNING id, request_id, action, actor, notes, created_at
        ",
    )
    .bind(entry.request_id)
    .bind(entry.action.to_string())
    .bind(&entry.actor)
    .bind(&entry.notes)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

/// List a request's log entries in the order they happened.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_logs<'e, E>(
    executor: E,
    request_id: RequestId,
) -> Result<Vec<RequestLog>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, RequestLogRow>(
        r"
        SELECT id, request_id, action, actor, notes, created_at
        FROM request_logs
        WHERE request_id = $1
        ORDER BY created_at ASC, id ASC
        ",
    )
    .bind(request_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(RequestLog::try_from).collect()
}

/// Count requests in a given status.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_by_status<'e, E>(
    executor: E,
    status: RequestStatus,
) -> Result<i64, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let count = sqlx::query_scalar::<_, i64>(
        r"
        SELECT COUNT(*)
        FROM requests
        WHERE status = $1
        ",
    )
    .bind(status.to_string())
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Most recent request log entries as activity entries, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn recent_activity<'e, E>(
    executor: E,
    limit: i64,
) -> Result<Vec<ActivityEntry>, RepositoryError>
where
    E: Executor<'e, Database = Postgres>,
{
    #[derive(Debug, sqlx::FromRow)]
    struct ActivityRow {
        id: i32,
        action: String,
        item_name: String,
        actor: String,
        created_at: DateTime<Utc>,
    }

    let rows = sqlx::query_as::<_, ActivityRow>(
        r"
        SELECT rl.id, rl.action, i.name AS item_name, rl.actor, rl.created_at
        FROM request_logs rl
        JOIN requests r ON r.id = rl.request_id
        JOIN items i ON i.id = r.item_id
        ORDER BY rl.created_at DESC, rl.id DESC
        LIMIT $1
        ",
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ActivityEntry {
            id: row.id,
            action: row.action,
            item_name: row.item_name,
            user: row.actor,
            date: row.created_at,
            kind: ActivityKind::Request,
        })
        .collect())
}
