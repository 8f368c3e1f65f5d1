//! # Ledger Config
//!
//! Layered configuration for the transaction ledger: TOML files per
//! environment, local overrides, and `LEDGER_`-prefixed environment variables.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
