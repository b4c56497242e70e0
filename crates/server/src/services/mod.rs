//! Business logic services for the stock ledger.
//!
//! # Services
//!
//! - `ledger` - Item registry and the canonical stock mutation path
//! - `series` - Serial-number range allocation against item stock
//! - `requests` - Stock request workflow with bulk decisions
//! - `dashboard` - Aggregated stats and the recent activity feed

pub mod dashboard;
pub mod ledger;
pub mod requests;
pub mod series;

pub use dashboard::DashboardService;
pub use ledger::{Entity, LedgerError, LedgerService};
pub use requests::RequestService;
pub use series::SeriesService;
