//! Result type aliases for the ledger.

use crate::LedgerError;

/// A specialized `Result` type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
