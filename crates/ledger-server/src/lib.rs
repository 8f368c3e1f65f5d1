//! # Ledger Server Library
//!
//! Dependency injection wiring, metrics export and startup utilities for the
//! ledger server binary.

pub mod di;
pub mod metrics;
pub mod startup;
