//! Transaction service implementation.

use crate::cache::TransactionCacheInterface;
use crate::dto::{
    require_transaction_id, TransactionEditRequest, TransactionPageResponse, TransactionResponse,
};
use crate::id_generator::TransactionIdGenerator;
use crate::invalidation::{register_invalidation, CacheInvalidationCallback};
use crate::transaction_service::TransactionService;
use async_trait::async_trait;
use ledger_core::{
    LedgerError, LedgerResult, Page, PageRequest, TransactionRecord, ValidateExt,
};
use ledger_repository::{UnitOfWork, UnitOfWorkFactory};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

const RESOURCE: &str = "Transaction";

/// Transaction service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = TransactionService)]
pub struct TransactionServiceImpl {
    #[shaku(inject)]
    units_of_work: Arc<dyn UnitOfWorkFactory>,

    #[shaku(inject)]
    cache: Arc<dyn TransactionCacheInterface>,

    /// Shared by every call on this instance.
    id_generator: Arc<TransactionIdGenerator>,
}

impl TransactionServiceImpl {
    /// Creates a new transaction service.
    #[must_use]
    pub fn new(
        units_of_work: Arc<dyn UnitOfWorkFactory>,
        cache: Arc<dyn TransactionCacheInterface>,
        id_generator: Arc<TransactionIdGenerator>,
    ) -> Self {
        Self {
            units_of_work,
            cache,
            id_generator,
        }
    }

    fn invalidation(&self, transaction_id: &str, invalidate_total: bool) -> CacheInvalidationCallback {
        CacheInvalidationCallback::new(
            Arc::clone(&self.cache),
            Some(transaction_id.to_string()),
            invalidate_total,
        )
    }

    /// Commits on success, rolls back on failure and returns the body's error.
    async fn complete<T: Send>(uow: Box<dyn UnitOfWork>, result: LedgerResult<T>) -> LedgerResult<T> {
        match result {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(e) => {
                debug!("Rolling back after error: {}", e);
                if let Err(rollback) = uow.rollback().await {
                    warn!("Rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    async fn create_in(
        &self,
        uow: &mut dyn UnitOfWork,
        request: &TransactionEditRequest,
    ) -> LedgerResult<TransactionRecord> {
        let transaction_id = match request.supplied_transaction_id() {
            Some(id) => id.to_string(),
            None => self.id_generator.generate(),
        };

        if uow
            .transactions()
            .exists_by_transaction_id(&transaction_id)
            .await?
        {
            return Err(LedgerError::already_exists(format!(
                "Transaction '{transaction_id}' already exists"
            )));
        }

        let record = request.to_record(transaction_id.clone())?;
        if uow.transactions().insert(&record).await? == 0 {
            return Err(LedgerError::CreateFailed(format!(
                "Insert of '{transaction_id}' affected no rows"
            )));
        }

        register_invalidation(uow, self.invalidation(&transaction_id, true)).await;

        uow.transactions()
            .find_by_transaction_id(&transaction_id)
            .await?
            .ok_or_else(|| {
                LedgerError::CreateFailed(format!("Transaction '{transaction_id}' not found after insert"))
            })
    }

    async fn update_in(
        &self,
        uow: &mut dyn UnitOfWork,
        transaction_id: &str,
        request: &TransactionEditRequest,
    ) -> LedgerResult<TransactionRecord> {
        let mut record = uow
            .transactions()
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(RESOURCE, transaction_id))?;

        request.apply_to(&mut record)?;

        if uow.transactions().update(&record).await? == 0 {
            return Err(LedgerError::UpdateFailed(format!(
                "Update of '{transaction_id}' affected no rows"
            )));
        }

        register_invalidation(uow, self.invalidation(transaction_id, false)).await;
        Ok(record)
    }

    async fn delete_in(&self, uow: &mut dyn UnitOfWork, transaction_id: &str) -> LedgerResult<bool> {
        if uow
            .transactions()
            .find_by_transaction_id(transaction_id)
            .await?
            .is_none()
        {
            return Err(LedgerError::not_found(RESOURCE, transaction_id));
        }

        if uow.transactions().delete_by_transaction_id(transaction_id).await? == 0 {
            return Ok(false);
        }

        register_invalidation(uow, self.invalidation(transaction_id, true)).await;
        Ok(true)
    }
}

fn ensure_transaction_id(transaction_id: &str) -> LedgerResult<()> {
    if transaction_id.trim().is_empty() {
        return Err(LedgerError::invalid_parameter(
            "transactionId: Transaction ID cannot be blank",
        ));
    }
    Ok(())
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn create(&self, request: TransactionEditRequest) -> LedgerResult<TransactionResponse> {
        debug!("Creating transaction: {:?}", request.transaction_id);

        request.validate_request()?;

        let mut uow = self.units_of_work.begin().await?;
        let result = self.create_in(uow.as_mut(), &request).await;
        let record = Self::complete(uow, result).await?;

        info!("Transaction created: {}", record.transaction_id);
        Ok(TransactionResponse::from(record))
    }

    async fn update(&self, request: TransactionEditRequest) -> LedgerResult<TransactionResponse> {
        debug!("Updating transaction: {:?}", request.transaction_id);

        request.validate_request()?;
        let transaction_id = require_transaction_id(&request)?;

        let mut uow = self.units_of_work.begin().await?;
        let result = self.update_in(uow.as_mut(), &transaction_id, &request).await;
        let record = Self::complete(uow, result).await?;

        info!("Transaction updated: {}", transaction_id);
        Ok(TransactionResponse::from(record))
    }

    async fn delete(&self, transaction_id: &str) -> LedgerResult<bool> {
        debug!("Deleting transaction: {}", transaction_id);

        ensure_transaction_id(transaction_id)?;

        let mut uow = self.units_of_work.begin().await?;
        let result = self.delete_in(uow.as_mut(), transaction_id).await;
        let deleted = Self::complete(uow, result).await?;

        if deleted {
            info!("Transaction deleted: {}", transaction_id);
        } else {
            warn!("Delete of '{}' affected no rows", transaction_id);
        }
        Ok(deleted)
    }

    async fn get_by_id(&self, transaction_id: &str) -> LedgerResult<TransactionResponse> {
        debug!("Getting transaction: {}", transaction_id);

        ensure_transaction_id(transaction_id)?;

        if let Some(cached) = self.cache.get_record(transaction_id).await {
            debug!("Cache hit for transaction: {}", transaction_id);
            return Ok(TransactionResponse::from(cached));
        }

        let record = self
            .units_of_work
            .reader()
            .await?
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(RESOURCE, transaction_id))?;

        self.cache.set_record(&record).await;
        Ok(TransactionResponse::from(record))
    }

    async fn list(&self, page: PageRequest) -> LedgerResult<TransactionPageResponse> {
        debug!("Listing transactions, page: {}, size: {}", page.page, page.size);

        let mut reader = self.units_of_work.reader().await?;
        let content = reader
            .find_page(page.offset() as u64, page.limit() as u64)
            .await?;

        let total = match self.cache.get_total_count().await {
            Some(total) => total,
            None => {
                let total = reader.count_total().await?;
                self.cache.set_total_count(total).await;
                total
            }
        };

        Ok(TransactionPageResponse::from(Page::new(
            content, page.page, page.size, total,
        )))
    }

    async fn exists_by_transaction_id(&self, transaction_id: &str) -> LedgerResult<bool> {
        self.units_of_work
            .reader()
            .await?
            .exists_by_transaction_id(transaction_id)
            .await
    }
}

impl std::fmt::Debug for TransactionServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionServiceImpl")
            .field("id_generator", &self.id_generator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryUnitOfWorkFactory, RecordingCache};
    use ledger_core::TransactionKind;
    use std::collections::HashSet;

    struct Fixture {
        store: Arc<MemoryUnitOfWorkFactory>,
        cache: Arc<RecordingCache>,
        service: Arc<TransactionServiceImpl>,
    }

    fn fixture_with(store: MemoryUnitOfWorkFactory) -> Fixture {
        let store = Arc::new(store);
        let cache = Arc::new(RecordingCache::default());
        let service = Arc::new(TransactionServiceImpl::new(
            store.clone(),
            cache.clone(),
            Arc::new(TransactionIdGenerator::default()),
        ));
        Fixture {
            store,
            cache,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemoryUnitOfWorkFactory::transactional())
    }

    fn request(transaction_id: Option<&str>, amount: i32) -> TransactionEditRequest {
        TransactionEditRequest {
            transaction_id: transaction_id.map(ToString::to_string),
            amount,
            transaction_type: 1,
            account_number: "6222000011112222".to_string(),
            counterparty_account: "6222000033334444".to_string(),
            description: Some("coffee".to_string()),
        }
    }

    fn looks_generated(id: &str) -> bool {
        id.len() == 15 && id.starts_with("TXN") && id[3..].chars().all(|c| c.is_ascii_digit())
    }

    // =========================================================================
    // Create
    // =========================================================================

    #[tokio::test]
    async fn test_create_generates_identifier() {
        let fx = fixture();

        let created = fx.service.create(request(None, 1250)).await.unwrap();

        assert!(looks_generated(&created.transaction_id));
        assert!(created.id > 0);
        assert_eq!(created.amount, 1250);
        assert_eq!(fx.store.rows().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_identifier() {
        let fx = fixture();

        let created = fx.service.create(request(Some("TXN-A"), 10)).await.unwrap();

        assert_eq!(created.transaction_id, "TXN-A");
    }

    #[tokio::test]
    async fn test_create_invalidates_after_commit() {
        let fx = fixture();
        fx.cache.put_total(4);
        fx.cache.put_record(request(Some("TXN-A"), 1).to_record("TXN-A".to_string()).unwrap());

        fx.service.create(request(Some("TXN-A"), 10)).await.unwrap();

        assert_eq!(fx.cache.total(), None);
        assert!(!fx.cache.has_record("TXN-A"));
        assert_eq!(
            fx.cache.deletions(),
            vec!["transaction:data:TXN-A", "transaction:total:count"]
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_is_rejected_without_side_effects() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-DUP"), 10)).await.unwrap();
        fx.cache.clear_log();
        fx.cache.put_total(1);

        let err = fx.service.create(request(Some("TXN-DUP"), 20)).await.unwrap_err();

        assert_eq!(err.error_code(), "ALREADY_EXISTS");
        assert_eq!(err.numeric_code(), -102);
        assert_eq!(fx.store.rows().await.len(), 1);
        assert_eq!(fx.store.rows().await[0].amount, 10);
        assert!(fx.cache.deletions().is_empty());
        assert_eq!(fx.cache.total(), Some(1));
    }

    #[tokio::test]
    async fn test_create_invalid_request_never_reaches_store() {
        let fx = fixture();

        let err = fx.service.create(request(None, 0)).await.unwrap_err();

        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(fx.store.begun(), 0);
        assert!(fx.cache.deletions().is_empty());
    }

    #[tokio::test]
    async fn test_create_zero_rows_is_create_failed() {
        let fx = fixture();
        fx.store.affect_no_rows();

        let err = fx.service.create(request(Some("TXN-Z"), 10)).await.unwrap_err();

        assert_eq!(err.error_code(), "CREATE_FAILED");
        assert!(fx.cache.deletions().is_empty());
    }

    #[tokio::test]
    async fn test_create_failing_reread_rolls_back_without_invalidation() {
        let fx = fixture();
        fx.cache.put_total(3);
        fx.store.hide_inserted_rows();

        let err = fx.service.create(request(Some("TXN-R"), 10)).await.unwrap_err();

        assert_eq!(err.error_code(), "CREATE_FAILED");
        assert!(fx.store.rows().await.is_empty());
        assert!(fx.cache.deletions().is_empty());
        assert_eq!(fx.cache.total(), Some(3));
        assert_eq!(fx.store.rolled_back(), 1);
    }

    #[tokio::test]
    async fn test_commit_failure_never_invalidates() {
        let fx = fixture();
        fx.cache.put_total(3);
        fx.store.fail_commits();

        let err = fx.service.create(request(Some("TXN-F"), 10)).await.unwrap_err();

        assert_eq!(err.error_code(), "SYSTEM_ERROR");
        assert!(fx.store.rows().await.is_empty());
        assert!(fx.cache.deletions().is_empty());
        assert_eq!(fx.cache.total(), Some(3));
    }

    #[tokio::test]
    async fn test_without_synchronization_invalidation_runs_immediately() {
        let fx = fixture_with(MemoryUnitOfWorkFactory::auto_commit());
        fx.cache.put_total(9);

        fx.service.create(request(Some("TXN-S"), 10)).await.unwrap();

        assert_eq!(fx.cache.total(), None);
        assert_eq!(
            fx.cache.deletions(),
            vec!["transaction:data:TXN-S", "transaction:total:count"]
        );
        assert_eq!(fx.store.rows().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_identifiers() {
        let fx = fixture();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = Arc::clone(&fx.service);
                tokio::spawn(async move { service.create(request(None, i + 1)).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let created = handle.await.unwrap().unwrap();
            assert!(looks_generated(&created.transaction_id));
            ids.insert(created.transaction_id);
        }

        assert_eq!(ids.len(), 20);
        assert_eq!(fx.store.rows().await.len(), 20);
    }

    // =========================================================================
    // Update
    // =========================================================================

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-U"), 10)).await.unwrap();

        let mut change = request(Some("TXN-U"), 999);
        change.transaction_type = 2;
        change.description = None;
        let updated = fx.service.update(change).await.unwrap();

        assert_eq!(updated.transaction_id, "TXN-U");
        assert_eq!(updated.amount, 999);
        assert_eq!(updated.transaction_type, 2);
        assert!(updated.description.is_none());

        let stored = &fx.store.rows().await[0];
        assert_eq!(stored.amount, 999);
        assert_eq!(stored.transaction_type, TransactionKind::Credit);
        assert!(stored.description.is_none());
    }

    #[tokio::test]
    async fn test_update_invalidates_record_only() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-U"), 10)).await.unwrap();
        fx.service.get_by_id("TXN-U").await.unwrap();
        fx.cache.put_total(1);
        fx.cache.clear_log();

        fx.service.update(request(Some("TXN-U"), 20)).await.unwrap();

        assert_eq!(fx.cache.deletions(), vec!["transaction:data:TXN-U"]);
        assert!(!fx.cache.has_record("TXN-U"));
        assert_eq!(fx.cache.total(), Some(1));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-KEEP"), 10)).await.unwrap();
        fx.cache.clear_log();

        let err = fx.service.update(request(Some("TXN-NONE"), 20)).await.unwrap_err();

        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.status_code(), 404);
        let rows = fx.store.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 10);
        assert!(fx.cache.deletions().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_identifier() {
        let fx = fixture();

        let err = fx.service.update(request(None, 20)).await.unwrap_err();

        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(fx.store.begun(), 0);
    }

    #[tokio::test]
    async fn test_update_never_changes_identifier() {
        let fx = fixture();
        let created = fx.service.create(request(None, 10)).await.unwrap();

        let updated = fx
            .service
            .update(request(Some(&created.transaction_id), 30))
            .await
            .unwrap();

        assert_eq!(updated.transaction_id, created.transaction_id);
        assert_eq!(updated.id, created.id);
        assert_eq!(fx.store.rows().await[0].transaction_id, created.transaction_id);
    }

    #[tokio::test]
    async fn test_update_zero_rows_is_update_failed() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-U"), 10)).await.unwrap();
        fx.cache.clear_log();
        fx.store.affect_no_rows();

        let err = fx.service.update(request(Some("TXN-U"), 20)).await.unwrap_err();

        assert_eq!(err.error_code(), "UPDATE_FAILED");
        assert!(fx.cache.deletions().is_empty());
    }

    // =========================================================================
    // Delete
    // =========================================================================

    #[tokio::test]
    async fn test_delete_existing() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-D"), 10)).await.unwrap();
        fx.service.get_by_id("TXN-D").await.unwrap();
        fx.cache.clear_log();

        assert!(fx.service.delete("TXN-D").await.unwrap());

        assert_eq!(
            fx.cache.deletions(),
            vec!["transaction:data:TXN-D", "transaction:total:count"]
        );
        assert!(!fx.cache.has_record("TXN-D"));

        let err = fx.service.get_by_id("TXN-D").await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!fx.cache.has_record("TXN-D"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let fx = fixture();

        let err = fx.service.delete("TXN-NONE").await.unwrap_err();

        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(fx.cache.deletions().is_empty());
    }

    #[tokio::test]
    async fn test_delete_zero_rows_returns_false_without_invalidation() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-D"), 10)).await.unwrap();
        fx.cache.clear_log();
        fx.store.affect_no_rows();

        assert!(!fx.service.delete("TXN-D").await.unwrap());
        assert!(fx.cache.deletions().is_empty());
    }

    #[tokio::test]
    async fn test_delete_blank_identifier() {
        let fx = fixture();
        let err = fx.service.delete("  ").await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[tokio::test]
    async fn test_get_by_id_reads_through_cache() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-G"), 10)).await.unwrap();
        let reads_before = fx.store.reads();

        let first = fx.service.get_by_id("TXN-G").await.unwrap();
        let second = fx.service.get_by_id("TXN-G").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fx.store.reads() - reads_before, 1);
        assert_eq!(fx.cache.record_hits(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let fx = fixture();

        let err = fx.service.get_by_id("TXN-NONE").await.unwrap_err();

        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!fx.cache.has_record("TXN-NONE"));
    }

    #[tokio::test]
    async fn test_list_metadata_for_25_records() {
        let fx = fixture();
        for i in 0..25 {
            fx.service
                .create(request(Some(&format!("TXN-{i:02}")), i + 1))
                .await
                .unwrap();
        }

        let first = fx.service.list(PageRequest::new(0, 10)).await.unwrap();
        assert_eq!(first.total_elements, 25);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.number_of_elements, 10);
        assert!(first.first);
        assert!(!first.last);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.content[0].transaction_id, "TXN-00");

        let last = fx.service.list(PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(last.number_of_elements, 5);
        assert!(!last.first);
        assert!(last.last);
        assert!(!last.has_next);
        assert!(last.has_previous);
        assert_eq!(last.content[0].transaction_id, "TXN-20");
    }

    #[tokio::test]
    async fn test_list_uses_cached_total() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-1"), 1)).await.unwrap();

        let page = fx.service.list(PageRequest::new(0, 10)).await.unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(fx.cache.total(), Some(1));

        fx.cache.put_total(40);
        let page = fx.service.list(PageRequest::new(0, 10)).await.unwrap();
        assert_eq!(page.total_elements, 40);
        assert_eq!(page.total_pages, 4);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let fx = fixture();

        let page = fx.service.list(PageRequest::first()).await.unwrap();

        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(page.first);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_exists_by_transaction_id() {
        let fx = fixture();
        fx.service.create(request(Some("TXN-E"), 1)).await.unwrap();

        assert!(fx.service.exists_by_transaction_id("TXN-E").await.unwrap());
        assert!(!fx.service.exists_by_transaction_id("TXN-X").await.unwrap());
    }
}
