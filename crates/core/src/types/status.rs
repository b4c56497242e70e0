//! Status enums for items, series, requests, and stock movements.
//!
//! All of these are stored as `TEXT` in Postgres and round-trip through
//! `Display`/`FromStr`, so the database stays free of custom enum types.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an inventory item.
///
/// Items are never hard-deleted; a `deleted` item is excluded from reads
/// but its id stays valid for historical logs and requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    #[default]
    Active,
    Deleted,
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

impl std::str::FromStr for ItemState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            _ => Err(format!("invalid item state: {s}")),
        }
    }
}

/// Direction of a series allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// The series added its quantity to item stock.
    Deposit,
    /// The series removed its quantity from item stock.
    Withdraw,
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
        }
    }
}

impl std::str::FromStr for SeriesKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            _ => Err(format!("invalid series kind: {s}")),
        }
    }
}

/// Action recorded by an item stock log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockAction {
    Deposit,
    Withdraw,
    /// Absolute stock adjustment through the update path.
    Update,
    /// Reversal written when a series is deleted.
    DeleteSeries,
}

impl std::fmt::Display for StockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
            Self::Update => write!(f, "update"),
            Self::DeleteSeries => write!(f, "delete-series"),
        }
    }
}

impl std::str::FromStr for StockAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            "update" => Ok(Self::Update),
            "delete-series" => Ok(Self::DeleteSeries),
            _ => Err(format!("invalid stock action: {s}")),
        }
    }
}

/// Action recorded by a request workflow log entry.
///
/// Serialized capitalized (`"Created"`, `"Approved"`, ...) to match the
/// wire format of request histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestAction {
    Created,
    Approved,
    Rejected,
    Fulfilled,
}

impl std::fmt::Display for RequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
            Self::Fulfilled => write!(f, "Fulfilled"),
        }
    }
}

impl std::str::FromStr for RequestAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            "Fulfilled" => Ok(Self::Fulfilled),
            _ => Err(format!("invalid request action: {s}")),
        }
    }
}

/// Lifecycle status of a stock request.
///
/// Valid transitions: `pending → approved`, `pending → rejected`,
/// `approved → fulfilled`. Everything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl RequestStatus {
    /// Whether a transition from `self` to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected) | (Self::Approved, Self::Fulfilled)
        )
    }

    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Fulfilled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Fulfilled => write!(f, "fulfilled"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "fulfilled" => Ok(Self::Fulfilled),
            _ => Err(format!("invalid request status: {s}")),
        }
    }
}
