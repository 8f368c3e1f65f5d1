//! # Ledger REST
//!
//! REST API layer using Axum for the transaction ledger.
//! Provides the transaction endpoints, health endpoints and the OpenAPI document.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
