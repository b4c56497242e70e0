//! Stock request workflow.
//!
//! Requests move `pending → approved → fulfilled`, with `rejected` as the
//! other terminal outcome of a decision. Fulfilment withdraws the
//! requested quantity through the ledger path, so an approved request can
//! still fail at fulfilment time if stock has run out. Every transition
//! appends a workflow log entry in the same transaction.

use std::collections::BTreeSet;

use sqlx::PgPool;
use tracing::{info, instrument};

use stockroom_core::{RequestAction, RequestId, RequestStatus, StockAction};

use crate::db::{self, RepositoryError};
use crate::models::{
    ApproveRequestInput, BulkRequestInput, CreateRequestInput, FulfillOutcome,
    FulfillRequestInput, NewRequest, NewRequestLog, Request, RequestDetails, RequestLog,
};
use crate::services::ledger::{Entity, LedgerError, apply_stock_delta};

/// Fallback actor recorded when a decision arrives without one.
const SYSTEM_ACTOR: &str = "System";

/// Request workflow service.
pub struct RequestService {
    pool: PgPool,
}

impl RequestService {
    /// Create a new request service.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending request.
    ///
    /// Stock is not touched or reserved here; it only moves at
    /// fulfilment.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidValue`] for a non-positive quantity
    /// and [`LedgerError::NotFound`] if the user or item is missing.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, item_id = %input.item_id))]
    pub async fn create(&self, input: CreateRequestInput) -> Result<Request, LedgerError> {
        if input.quantity <= 0 {
            return Err(LedgerError::InvalidValue("quantity must be positive".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let user = db::users::find(&mut *tx, input.user_id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::User))?;
        db::items::find_active(&mut *tx, input.item_id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;

        let request = db::requests::insert(
            &mut *tx,
            &NewRequest {
                user_id: input.user_id,
                item_id: input.item_id,
                quantity: input.quantity,
                notes: input.notes.clone(),
            },
        )
        .await?;
        db::requests::append_log(
            &mut *tx,
            &NewRequestLog {
                request_id: request.id,
                action: RequestAction::Created,
                actor: user.name,
                notes: Some(input.notes.unwrap_or_else(|| "New request created".to_string())),
            },
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %request.id, "Created request");
        Ok(request)
    }

    /// Fetch a request with its user and item names.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the request does not exist.
    pub async fn get(&self, id: RequestId) -> Result<RequestDetails, LedgerError> {
        db::requests::find_details(&self.pool, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Request))
    }

    /// List requests, newest first, optionally filtered by status and
    /// windowed by `limit`/`offset`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Repository`] if the query fails.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<RequestDetails>, LedgerError> {
        // Negative window values read as "no constraint"
        let limit = limit.filter(|value| *value >= 0);
        let offset = offset.filter(|value| *value >= 0);
        Ok(db::requests::list(&self.pool, status, limit, offset).await?)
    }

    /// Decide a pending request.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the request does not exist
    /// and [`LedgerError::InvalidState`] if it is not pending.
    #[instrument(skip(self, input), fields(approve = input.approve))]
    pub async fn approve(
        &self,
        id: RequestId,
        input: ApproveRequestInput,
    ) -> Result<Request, LedgerError> {
        let target = if input.approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };
        let action = if input.approve {
            RequestAction::Approved
        } else {
            RequestAction::Rejected
        };

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let request = db::requests::find_for_update(&mut *tx, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Request))?;
        if !request.status.can_transition_to(target) {
            return Err(LedgerError::InvalidState {
                id,
                expected: RequestStatus::Pending,
                actual: request.status,
            });
        }

        let approver = input.approver.unwrap_or_else(|| SYSTEM_ACTOR.to_string());
        let updated = db::requests::set_status(&mut *tx, id, target, Some(&approver)).await?;
        db::requests::append_log(
            &mut *tx,
            &NewRequestLog {
                request_id: id,
                action,
                actor: approver,
                notes: input.notes,
            },
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %id, status = %target, "Decided request");
        Ok(updated)
    }

    /// Fulfil an approved request, withdrawing its quantity from stock.
    ///
    /// The request row is locked before the item row; every multi-row
    /// path in this service takes locks in that order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the request or item is
    /// missing, [`LedgerError::InvalidState`] if the request is not
    /// approved, and [`LedgerError::InsufficientStock`] if the item no
    /// longer has the quantity on hand.
    #[instrument(skip(self, input))]
    pub async fn fulfill(
        &self,
        id: RequestId,
        input: FulfillRequestInput,
    ) -> Result<FulfillOutcome, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let request = db::requests::find_for_update(&mut *tx, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Request))?;
        if !request.status.can_transition_to(RequestStatus::Fulfilled) {
            return Err(LedgerError::InvalidState {
                id,
                expected: RequestStatus::Approved,
                actual: request.status,
            });
        }

        let item = db::items::find_active_for_update(&mut *tx, request.item_id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Item))?;
        let item = apply_stock_delta(
            &mut tx,
            &item,
            -request.quantity,
            StockAction::Withdraw,
            format!("Fulfilled request #{id}"),
        )
        .await?;

        let updated = db::requests::set_status(&mut *tx, id, RequestStatus::Fulfilled, None).await?;
        db::requests::append_log(
            &mut *tx,
            &NewRequestLog {
                request_id: id,
                action: RequestAction::Fulfilled,
                actor: input.actor.unwrap_or_else(|| SYSTEM_ACTOR.to_string()),
                notes: Some(
                    input
                        .notes
                        .unwrap_or_else(|| format!("Fulfilled {} units", request.quantity)),
                ),
            },
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(id = %id, item_id = %item.id, "Fulfilled request");
        Ok(FulfillOutcome { request: updated, item })
    }

    /// Approve a batch of pending requests, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if any id is missing and
    /// [`LedgerError::InvalidState`] if any request is not pending; no
    /// request changes in either case.
    #[instrument(skip(self, input), fields(count = input.ids.len()))]
    pub async fn bulk_approve(&self, input: BulkRequestInput) -> Result<Vec<Request>, LedgerError> {
        self.bulk_transition(input, true).await
    }

    /// Reject a batch of pending requests, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if any id is missing and
    /// [`LedgerError::InvalidState`] if any request is not pending; no
    /// request changes in either case.
    #[instrument(skip(self, input), fields(count = input.ids.len()))]
    pub async fn bulk_reject(&self, input: BulkRequestInput) -> Result<Vec<Request>, LedgerError> {
        self.bulk_transition(input, false).await
    }

    async fn bulk_transition(
        &self,
        input: BulkRequestInput,
        approve: bool,
    ) -> Result<Vec<Request>, LedgerError> {
        // Deduplicated and ascending, which is also the lock order.
        let ids: Vec<i32> = input
            .ids
            .iter()
            .map(RequestId::as_i32)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Err(LedgerError::InvalidValue("ids must not be empty".to_string()));
        }
        let (target, action) = if approve {
            (RequestStatus::Approved, RequestAction::Approved)
        } else {
            (RequestStatus::Rejected, RequestAction::Rejected)
        };

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let requests = db::requests::lock_many(&mut *tx, &ids).await?;
        if requests.len() != ids.len() {
            return Err(LedgerError::NotFound(Entity::Request));
        }
        for request in &requests {
            if !request.status.can_transition_to(target) {
                return Err(LedgerError::InvalidState {
                    id: request.id,
                    expected: RequestStatus::Pending,
                    actual: request.status,
                });
            }
        }

        let approver = input.approver.unwrap_or_else(|| SYSTEM_ACTOR.to_string());
        let mut updated = db::requests::set_status_many(&mut *tx, &ids, target, &approver).await?;
        updated.sort_by_key(|request| request.id.as_i32());
        for request in &updated {
            db::requests::append_log(
                &mut *tx,
                &NewRequestLog {
                    request_id: request.id,
                    action,
                    actor: approver.clone(),
                    notes: input.notes.clone(),
                },
            )
            .await?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(count = updated.len(), status = %target, "Decided requests in bulk");
        Ok(updated)
    }

    /// A request's workflow history in the order it happened.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the request does not exist.
    pub async fn logs(&self, id: RequestId) -> Result<Vec<RequestLog>, LedgerError> {
        db::requests::find(&self.pool, id)
            .await?
            .ok_or(LedgerError::NotFound(Entity::Request))?;
        Ok(db::requests::list_logs(&self.pool, id).await?)
    }
}
