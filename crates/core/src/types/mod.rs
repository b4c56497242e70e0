//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod range;
pub mod status;

pub use id::*;
pub use range::{RangeError, SeriesRange};
pub use status::*;
