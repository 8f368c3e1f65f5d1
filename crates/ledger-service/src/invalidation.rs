//! Post-commit cache invalidation.
//!
//! A write registers a [`CacheInvalidationCallback`] on its unit of work. The
//! callback deletes the affected cache entries only after the commit; a
//! rollback leaves the cache untouched. Without an active transaction the
//! deletion runs at once.

use crate::cache::TransactionCacheInterface;
use crate::metrics::CacheMetrics;
use async_trait::async_trait;
use ledger_repository::{CompletionStatus, TransactionSynchronization, UnitOfWork};
use std::sync::Arc;
use tracing::{debug, warn};

/// Deletes the per-record and total count entries touched by one write.
#[derive(Clone)]
pub struct CacheInvalidationCallback {
    cache: Arc<dyn TransactionCacheInterface>,
    transaction_id: Option<String>,
    invalidate_total: bool,
}

impl CacheInvalidationCallback {
    /// Creates a callback.
    #[must_use]
    pub fn new(
        cache: Arc<dyn TransactionCacheInterface>,
        transaction_id: Option<String>,
        invalidate_total: bool,
    ) -> Self {
        Self {
            cache,
            transaction_id,
            invalidate_total,
        }
    }

    /// Business identifier whose entry is invalidated, if any.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Whether the total count entry is invalidated.
    #[must_use]
    pub const fn invalidates_total(&self) -> bool {
        self.invalidate_total
    }

    /// Runs the deletions immediately.
    pub async fn invalidate_now(&self) {
        self.invalidate().await;
        CacheMetrics::invalidation("immediate");
    }

    async fn invalidate(&self) {
        if let Some(id) = &self.transaction_id {
            self.cache.delete_record(id).await;
        }
        if self.invalidate_total {
            self.cache.delete_total_count().await;
        }
        debug!(
            transaction_id = ?self.transaction_id,
            total = self.invalidate_total,
            "Cache invalidated"
        );
    }
}

#[async_trait]
impl TransactionSynchronization for CacheInvalidationCallback {
    async fn after_commit(&self) {
        self.invalidate().await;
        CacheMetrics::invalidation("after_commit");
    }

    async fn after_completion(&self, status: CompletionStatus) {
        if status == CompletionStatus::RolledBack {
            debug!(
                transaction_id = ?self.transaction_id,
                "Transaction rolled back, cache left untouched"
            );
        }
    }
}

impl std::fmt::Debug for CacheInvalidationCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheInvalidationCallback")
            .field("transaction_id", &self.transaction_id)
            .field("invalidate_total", &self.invalidate_total)
            .finish_non_exhaustive()
    }
}

/// Defers `callback` until `uow` commits, or runs it now when the unit of work
/// has no synchronization.
pub async fn register_invalidation(uow: &mut dyn UnitOfWork, callback: CacheInvalidationCallback) {
    if !uow.is_synchronization_active() {
        debug!("No active transaction, invalidating cache immediately");
        callback.invalidate_now().await;
        return;
    }

    if let Err(e) = uow.register_synchronization(Box::new(callback.clone())) {
        warn!("Failed to register cache invalidation, invalidating now: {}", e);
        callback.invalidate_now().await;
    }
}
