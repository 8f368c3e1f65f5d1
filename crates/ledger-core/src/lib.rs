//! # Ledger Core
//!
//! Core types shared by every layer of the transaction ledger: the error
//! taxonomy, pagination, request validation, and the transaction record entity.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
