//! HTTP middleware for the stock ledger API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `CorsLayer` (permissive, the API serves browser clients)
//! 2. `TraceLayer` (request spans with status and latency)
//! 3. Request ID (correlation ID recorded inside the trace span)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
