//! Domain entities for the ledger.

mod transaction;

pub use transaction::{TransactionKind, TransactionRecord};
