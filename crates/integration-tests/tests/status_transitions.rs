//! Integration tests for workflow statuses and ledger action tags.
//!
//! Statuses and actions are stored as text columns and travel through the
//! JSON API, so their Display/FromStr pair is a wire format. These tests pin
//! the exact strings and the request state machine.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use stockroom_core::{ItemState, RequestAction, RequestStatus, SeriesKind, StockAction};

// =============================================================================
// Request State Machine
// =============================================================================

#[test]
fn test_pending_requests_can_be_decided() {
    assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
    assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
    // Fulfilment requires an approval first
    assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Fulfilled));
    assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
}

#[test]
fn test_approved_requests_can_only_be_fulfilled() {
    assert!(RequestStatus::Approved.can_transition_to(RequestStatus::Fulfilled));
    assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Pending));
    assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Approved));
    assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Rejected));
}

#[test]
fn test_terminal_states_admit_no_transitions() {
    let all = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Fulfilled,
    ];

    for terminal in [RequestStatus::Rejected, RequestStatus::Fulfilled] {
        assert!(terminal.is_terminal());
        for next in all {
            assert!(
                !terminal.can_transition_to(next),
                "{terminal} must not transition to {next}"
            );
        }
    }
}

#[test]
fn test_open_states_are_not_terminal() {
    assert!(!RequestStatus::Pending.is_terminal());
    assert!(!RequestStatus::Approved.is_terminal());
}

#[test]
fn test_new_requests_default_to_pending() {
    assert_eq!(RequestStatus::default(), RequestStatus::Pending);
}

// =============================================================================
// Stored Text Values
// =============================================================================

#[test]
fn test_request_status_stored_text() {
    assert_eq!(RequestStatus::Pending.to_string(), "pending");
    assert_eq!(RequestStatus::Approved.to_string(), "approved");
    assert_eq!(RequestStatus::Rejected.to_string(), "rejected");
    assert_eq!(RequestStatus::Fulfilled.to_string(), "fulfilled");
}

#[test]
fn test_stock_action_stored_text() {
    assert_eq!(StockAction::Deposit.to_string(), "deposit");
    assert_eq!(StockAction::Withdraw.to_string(), "withdraw");
    assert_eq!(StockAction::Update.to_string(), "update");
    // Kebab-case, matching the log rows written by series deletion
    assert_eq!(StockAction::DeleteSeries.to_string(), "delete-series");
}

#[test]
fn test_request_log_actions_are_capitalized() {
    assert_eq!(RequestAction::Created.to_string(), "Created");
    assert_eq!(RequestAction::Approved.to_string(), "Approved");
    assert_eq!(RequestAction::Rejected.to_string(), "Rejected");
    assert_eq!(RequestAction::Fulfilled.to_string(), "Fulfilled");
}

#[test]
fn test_series_kind_and_item_state_stored_text() {
    assert_eq!(SeriesKind::Deposit.to_string(), "deposit");
    assert_eq!(SeriesKind::Withdraw.to_string(), "withdraw");
    assert_eq!(ItemState::Active.to_string(), "active");
    assert_eq!(ItemState::Deleted.to_string(), "deleted");
}

// =============================================================================
// Parsing Stored Text Back
// =============================================================================

#[test]
fn test_stored_text_parses_back() {
    assert_eq!(
        RequestStatus::from_str("fulfilled").unwrap(),
        RequestStatus::Fulfilled
    );
    assert_eq!(
        StockAction::from_str("delete-series").unwrap(),
        StockAction::DeleteSeries
    );
    assert_eq!(
        RequestAction::from_str("Rejected").unwrap(),
        RequestAction::Rejected
    );
    assert_eq!(SeriesKind::from_str("withdraw").unwrap(), SeriesKind::Withdraw);
    assert_eq!(ItemState::from_str("deleted").unwrap(), ItemState::Deleted);
}

#[test]
fn test_unknown_or_miscased_text_is_rejected() {
    assert!(RequestStatus::from_str("cancelled").is_err());
    assert!(RequestStatus::from_str("Pending").is_err());
    assert!(StockAction::from_str("deposited").is_err());
    assert!(RequestAction::from_str("created").is_err());
    assert!(SeriesKind::from_str("").is_err());
}

// =============================================================================
// JSON Wire Format
// =============================================================================

#[test]
fn test_statuses_serialize_to_the_stored_text() {
    assert_eq!(
        serde_json::to_value(RequestStatus::Approved).unwrap(),
        serde_json::json!("approved")
    );
    assert_eq!(
        serde_json::to_value(StockAction::DeleteSeries).unwrap(),
        serde_json::json!("delete-series")
    );
    assert_eq!(
        serde_json::to_value(RequestAction::Created).unwrap(),
        serde_json::json!("Created")
    );
}

#[test]
fn test_statuses_deserialize_from_the_stored_text() {
    let status: RequestStatus = serde_json::from_value(serde_json::json!("rejected")).unwrap();
    assert_eq!(status, RequestStatus::Rejected);

    let kind: SeriesKind = serde_json::from_value(serde_json::json!("deposit")).unwrap();
    assert_eq!(kind, SeriesKind::Deposit);
}
