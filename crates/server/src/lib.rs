//! Stockroom server library.
//!
//! This crate provides the HTTP API as a library, allowing it to be
//! tested and reused. The binary in `main.rs` wires it to a socket.
//!
//! # Layers
//!
//! - [`routes`] - Axum handlers and the response envelope
//! - [`services`] - Transactional domain logic (ledger, series, requests)
//! - [`db`] - Repository functions over `PostgreSQL`
//! - [`models`] - Wire and domain types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
