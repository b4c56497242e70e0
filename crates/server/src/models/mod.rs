//! Domain and wire models for the stockroom API.
//!
//! Wire-facing structs serialize with camelCase field names; internal
//! `New*` structs carry validated insert parameters and never touch serde.

pub mod dashboard;
pub mod item;
pub mod log;
pub mod request;
pub mod response;
pub mod series;
pub mod user;

pub use dashboard::{ActivityEntry, ActivityKind, DashboardStats, LowStockItem};
pub use item::{CreateItemInput, Item, NewItem, SetStockInput, StockAdjustmentInput, UpdateItemInput};
pub use log::{ItemLog, NewItemLog};
pub use request::{
    ApproveRequestInput, BulkRequestInput, CreateRequestInput, FulfillOutcome, FulfillRequestInput,
    NewRequest, NewRequestLog, Request, RequestDetails, RequestLog,
};
pub use response::ApiResponse;
pub use series::{CreateSeriesInput, NewSeries, Series, SeriesEndpoint, SeriesWithItem};
pub use user::User;
