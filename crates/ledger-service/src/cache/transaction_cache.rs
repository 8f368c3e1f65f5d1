//! Ledger-specific cache gateway.
//!
//! Every operation is best-effort: failures are logged and become a miss or a
//! no-op. Callers never see a cache error.

use super::{cache_keys, CacheExt, CacheInterface};
use crate::metrics::CacheMetrics;
use async_trait::async_trait;
use ledger_core::TransactionRecord;
use shaku::{Component, Interface};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default TTL of the total count entry (5 minutes).
pub const DEFAULT_TOTAL_COUNT_TTL: Duration = Duration::from_secs(300);

/// Default TTL of a per-record entry (10 minutes).
pub const DEFAULT_RECORD_TTL: Duration = Duration::from_secs(600);

const TOTAL_FAMILY: &str = "total_count";
const RECORD_FAMILY: &str = "record";

/// Cache of the total record count and of individual records.
#[async_trait]
pub trait TransactionCacheInterface: Interface + Send + Sync {
    /// Cached total record count.
    async fn get_total_count(&self) -> Option<u64>;

    /// Caches the total record count.
    async fn set_total_count(&self, total: u64);

    /// Drops the cached total record count.
    async fn delete_total_count(&self);

    /// Cached snapshot of a record.
    async fn get_record(&self, transaction_id: &str) -> Option<TransactionRecord>;

    /// Caches a snapshot of a record.
    async fn set_record(&self, record: &TransactionRecord);

    /// Drops the cached snapshot of a record.
    async fn delete_record(&self, transaction_id: &str);
}

/// [`TransactionCacheInterface`] over a raw [`CacheInterface`].
#[derive(Component)]
#[shaku(interface = TransactionCacheInterface)]
pub struct TransactionCache {
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,

    #[shaku(default = DEFAULT_TOTAL_COUNT_TTL)]
    total_count_ttl: Duration,

    #[shaku(default = DEFAULT_RECORD_TTL)]
    record_ttl: Duration,
}

impl TransactionCache {
    /// Creates a gateway with the default TTLs.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self::with_ttls(cache, DEFAULT_TOTAL_COUNT_TTL, DEFAULT_RECORD_TTL)
    }

    /// Creates a gateway with explicit TTLs.
    #[must_use]
    pub fn with_ttls(
        cache: Arc<dyn CacheInterface>,
        total_count_ttl: Duration,
        record_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            total_count_ttl,
            record_ttl,
        }
    }

    async fn delete_key(&self, family: &'static str, key: &str) {
        match self.cache.delete(key).await {
            Ok(existed) => debug!("Invalidated '{}' (present: {})", key, existed),
            Err(e) => {
                CacheMetrics::error(family, "delete");
                warn!("Failed to delete cache key '{}': {}", key, e);
            }
        }
    }
}

#[async_trait]
impl TransactionCacheInterface for TransactionCache {
    async fn get_total_count(&self) -> Option<u64> {
        match self.cache.get::<u64>(cache_keys::TOTAL_COUNT).await {
            Ok(total) => {
                CacheMetrics::lookup(TOTAL_FAMILY, total.is_some());
                total
            }
            Err(e) => {
                CacheMetrics::error(TOTAL_FAMILY, "get");
                warn!("Failed to read cached total count: {}", e);
                None
            }
        }
    }

    async fn set_total_count(&self, total: u64) {
        if let Err(e) = self
            .cache
            .set(cache_keys::TOTAL_COUNT, &total, self.total_count_ttl)
            .await
        {
            CacheMetrics::error(TOTAL_FAMILY, "set");
            warn!("Failed to cache total count: {}", e);
        }
    }

    async fn delete_total_count(&self) {
        self.delete_key(TOTAL_FAMILY, cache_keys::TOTAL_COUNT).await;
    }

    async fn get_record(&self, transaction_id: &str) -> Option<TransactionRecord> {
        let key = cache_keys::record(transaction_id);
        match self.cache.get::<TransactionRecord>(&key).await {
            Ok(record) => {
                CacheMetrics::lookup(RECORD_FAMILY, record.is_some());
                record
            }
            Err(e) => {
                CacheMetrics::error(RECORD_FAMILY, "get");
                warn!("Failed to read cached record '{}': {}", key, e);
                None
            }
        }
    }

    async fn set_record(&self, record: &TransactionRecord) {
        let key = cache_keys::record(&record.transaction_id);
        if let Err(e) = self.cache.set(&key, record, self.record_ttl).await {
            CacheMetrics::error(RECORD_FAMILY, "set");
            warn!("Failed to cache record '{}': {}", key, e);
        }
    }

    async fn delete_record(&self, transaction_id: &str) {
        self.delete_key(RECORD_FAMILY, &cache_keys::record(transaction_id))
            .await;
    }
}

impl std::fmt::Debug for TransactionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCache")
            .field("total_count_ttl", &self.total_count_ttl)
            .field("record_ttl", &self.record_ttl)
            .finish_non_exhaustive()
    }
}
