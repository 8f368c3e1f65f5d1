//! # Ledger Service
//!
//! Transaction workflow engine for the ledger, the cache gateway it reads
//! through, and the post-commit hook that invalidates stale cache entries.

pub mod cache;
pub mod dto;
pub mod id_generator;
pub mod invalidation;
pub mod metrics;
pub mod transaction_service;
pub mod r#impl;

#[cfg(test)]
mod testing;

pub use cache::*;
pub use dto::*;
pub use id_generator::TransactionIdGenerator;
pub use invalidation::{register_invalidation, CacheInvalidationCallback};
pub use transaction_service::TransactionService;
pub use r#impl::{TransactionServiceImpl, TransactionServiceImplParameters};
