//! Transaction service trait definition.

use crate::dto::{TransactionEditRequest, TransactionPageResponse, TransactionResponse};
use async_trait::async_trait;
use ledger_core::{Interface, LedgerResult, PageRequest};

/// Transaction workflow engine.
///
/// Writes run inside one unit of work and invalidate the affected cache
/// entries after it commits. Reads go through the cache first.
#[async_trait]
pub trait TransactionService: Interface + Send + Sync {
    /// Creates a record, generating the business identifier when none is supplied.
    async fn create(&self, request: TransactionEditRequest) -> LedgerResult<TransactionResponse>;

    /// Overwrites the record named by `request.transaction_id`.
    async fn update(&self, request: TransactionEditRequest) -> LedgerResult<TransactionResponse>;

    /// Deletes a record. `Ok(false)` when the store removed nothing.
    async fn delete(&self, transaction_id: &str) -> LedgerResult<bool>;

    /// Gets a record by business identifier.
    async fn get_by_id(&self, transaction_id: &str) -> LedgerResult<TransactionResponse>;

    /// Lists records in insertion order.
    async fn list(&self, page: PageRequest) -> LedgerResult<TransactionPageResponse>;

    /// Checks whether a record exists.
    async fn exists_by_transaction_id(&self, transaction_id: &str) -> LedgerResult<bool>;
}
