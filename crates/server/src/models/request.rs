//! Stock request workflow models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, RequestAction, RequestId, RequestLogId, RequestStatus, UserId};

use crate::models::item::Item;

/// A stock request moving through the pending/approved/fulfilled workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Unique request ID.
    pub id: RequestId,
    /// User who raised the request.
    pub user_id: UserId,
    /// Item being requested.
    pub item_id: ItemId,
    /// Units requested. Always positive.
    pub quantity: i64,
    /// Optional note from the requester.
    pub notes: Option<String>,
    /// Current workflow status.
    pub status: RequestStatus,
    /// Who approved or rejected the request, once decided.
    pub approver: Option<String>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A request joined with its user and item names for list views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: Request,
    /// Name of the requesting user.
    pub user_name: String,
    /// Name of the requested item.
    pub item_name: String,
}

/// One append-only workflow history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    /// Unique log entry ID.
    pub id: RequestLogId,
    /// Request the entry belongs to.
    pub request_id: RequestId,
    /// Workflow step recorded.
    pub action: RequestAction,
    /// Who performed the step.
    pub actor: String,
    /// Free-form note.
    pub notes: Option<String>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestInput {
    /// Requesting user.
    pub user_id: UserId,
    /// Requested item.
    pub item_id: ItemId,
    /// Units requested. Must be positive.
    pub quantity: i64,
    /// Optional note; also used for the "Created" log entry.
    pub notes: Option<String>,
}

/// Input for deciding a pending request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequestInput {
    /// `true` approves, `false` rejects.
    pub approve: bool,
    /// Who decided; defaults to "System".
    pub approver: Option<String>,
    /// Optional note for the log entry.
    pub notes: Option<String>,
}

/// Input for fulfilling an approved request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequestInput {
    /// Who fulfilled; defaults to "System".
    pub actor: Option<String>,
    /// Optional note for the log entry.
    pub notes: Option<String>,
}

/// Input for deciding a batch of pending requests at once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequestInput {
    /// Requests to decide. All must be pending.
    pub ids: Vec<RequestId>,
    /// Who decided; defaults to "System".
    pub approver: Option<String>,
    /// Optional note applied to every log entry.
    pub notes: Option<String>,
}

/// Fulfillment result: the request plus the item with decremented stock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillOutcome {
    pub request: Request,
    pub item: Item,
}

/// Validated insert parameters for a request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Insert parameters for a workflow log entry.
#[derive(Debug, Clone)]
pub struct NewRequestLog {
    pub request_id: RequestId,
    pub action: RequestAction,
    pub actor: String,
    pub notes: Option<String>,
}
