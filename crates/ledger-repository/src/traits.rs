//! Repository trait definitions.

use async_trait::async_trait;
use ledger_core::{LedgerResult, TransactionRecord};

/// Durable storage of transaction records.
///
/// Every method takes `&mut self` because it executes on the connection the
/// repository was built over. None of them commit on their own; the owning
/// unit of work decides that.
#[async_trait]
pub trait TransactionRepository: Send {
    /// Inserts a new record, returning the affected row count.
    async fn insert(&mut self, record: &TransactionRecord) -> LedgerResult<u64>;

    /// Deletes by business identifier, returning the affected row count.
    async fn delete_by_transaction_id(&mut self, transaction_id: &str) -> LedgerResult<u64>;

    /// Overwrites every mutable field of the record with the same business identifier.
    async fn update(&mut self, record: &TransactionRecord) -> LedgerResult<u64>;

    /// Finds a record by business identifier.
    async fn find_by_transaction_id(
        &mut self,
        transaction_id: &str,
    ) -> LedgerResult<Option<TransactionRecord>>;

    /// Checks whether a record with the business identifier exists.
    async fn exists_by_transaction_id(&mut self, transaction_id: &str) -> LedgerResult<bool>;

    /// Returns up to `limit` records starting at `offset`, in insertion order.
    async fn find_page(&mut self, offset: u64, limit: u64) -> LedgerResult<Vec<TransactionRecord>>;

    /// Counts all records.
    async fn count_total(&mut self) -> LedgerResult<u64>;
}
