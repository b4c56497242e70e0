//! User model.
//!
//! Users exist to attribute requests; there is no authentication layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::UserId;

/// A user who can raise stock requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name, recorded on request logs as the actor.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
