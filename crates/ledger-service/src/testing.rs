//! In-memory fakes shared by the service tests.

use crate::cache::{cache_keys, TransactionCacheInterface};
use async_trait::async_trait;
use chrono::Utc;
use ledger_core::{LedgerError, LedgerResult, TransactionRecord};
use ledger_repository::{
    synchronization_inactive, Synchronizations, TransactionRepository, TransactionSynchronization,
    UnitOfWork, UnitOfWorkFactory,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    rows: Vec<TransactionRecord>,
    next_id: i64,
}

#[derive(Debug, Default)]
struct Faults {
    no_rows: AtomicBool,
    hide_rows: AtomicBool,
    fail_commit: AtomicBool,
}

/// Gateway over a private copy of the store.
pub(crate) struct MemoryRepository {
    state: StoreState,
    reads: Arc<AtomicUsize>,
    faults: Arc<Faults>,
}

impl MemoryRepository {
    fn position(&self, transaction_id: &str) -> Option<usize> {
        self.state
            .rows
            .iter()
            .position(|r| r.transaction_id == transaction_id)
    }

    fn no_rows(&self) -> bool {
        self.faults.no_rows.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn insert(&mut self, record: &TransactionRecord) -> LedgerResult<u64> {
        if self.no_rows() {
            return Ok(0);
        }
        if self.position(&record.transaction_id).is_some() {
            return Err(LedgerError::already_exists(record.transaction_id.clone()));
        }
        self.state.next_id += 1;
        let mut stored = record.clone();
        stored.id = self.state.next_id;
        self.state.rows.push(stored);
        Ok(1)
    }

    async fn delete_by_transaction_id(&mut self, transaction_id: &str) -> LedgerResult<u64> {
        if self.no_rows() {
            return Ok(0);
        }
        Ok(match self.position(transaction_id) {
            Some(index) => {
                self.state.rows.remove(index);
                1
            }
            None => 0,
        })
    }

    async fn update(&mut self, record: &TransactionRecord) -> LedgerResult<u64> {
        if self.no_rows() {
            return Ok(0);
        }
        Ok(match self.position(&record.transaction_id) {
            Some(index) => {
                let stored = &mut self.state.rows[index];
                stored.amount = record.amount;
                stored.transaction_type = record.transaction_type;
                stored.account_number.clone_from(&record.account_number);
                stored.counterparty_account.clone_from(&record.counterparty_account);
                stored.description.clone_from(&record.description);
                stored.updated_at = Utc::now();
                1
            }
            None => 0,
        })
    }

    async fn find_by_transaction_id(
        &mut self,
        transaction_id: &str,
    ) -> LedgerResult<Option<TransactionRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.faults.hide_rows.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .position(transaction_id)
            .map(|index| self.state.rows[index].clone()))
    }

    async fn exists_by_transaction_id(&mut self, transaction_id: &str) -> LedgerResult<bool> {
        Ok(self.position(transaction_id).is_some())
    }

    async fn find_page(&mut self, offset: u64, limit: u64) -> LedgerResult<Vec<TransactionRecord>> {
        Ok(self
            .state
            .rows
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_total(&mut self) -> LedgerResult<u64> {
        Ok(self.state.rows.len() as u64)
    }
}

/// Unit of work holding the store lock for its whole life.
///
/// Writes go to a private copy that replaces the store on commit, so units
/// of work are serialized and a rollback discards everything.
pub(crate) struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    repository: MemoryRepository,
    synchronizations: Synchronizations,
    synchronization_active: bool,
    rolled_back: Arc<AtomicUsize>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn transactions(&mut self) -> &mut dyn TransactionRepository {
        &mut self.repository
    }

    fn is_synchronization_active(&self) -> bool {
        self.synchronization_active
    }

    fn register_synchronization(
        &mut self,
        synchronization: Box<dyn TransactionSynchronization>,
    ) -> LedgerResult<()> {
        if !self.synchronization_active {
            return Err(synchronization_inactive());
        }
        self.synchronizations.register(synchronization);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> LedgerResult<()> {
        let Self {
            mut guard,
            repository,
            synchronizations,
            ..
        } = *self;

        if repository.faults.fail_commit.load(Ordering::SeqCst) {
            drop(guard);
            synchronizations.trigger_rolled_back().await;
            return Err(LedgerError::Database("commit failed".to_string()));
        }

        *guard = repository.state;
        drop(guard);
        synchronizations.trigger_committed().await;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> LedgerResult<()> {
        let Self {
            mut guard,
            repository,
            synchronizations,
            synchronization_active,
            rolled_back,
        } = *self;

        if synchronization_active {
            rolled_back.fetch_add(1, Ordering::SeqCst);
        } else {
            // auto-commit: statements already took effect
            *guard = repository.state;
        }
        drop(guard);
        synchronizations.trigger_rolled_back().await;
        Ok(())
    }
}

/// Factory over one shared in-memory store.
pub(crate) struct MemoryUnitOfWorkFactory {
    store: Arc<AsyncMutex<StoreState>>,
    synchronization_active: bool,
    reads: Arc<AtomicUsize>,
    begun: AtomicUsize,
    rolled_back: Arc<AtomicUsize>,
    faults: Arc<Faults>,
}

impl MemoryUnitOfWorkFactory {
    fn with_synchronization(synchronization_active: bool) -> Self {
        Self {
            store: Arc::new(AsyncMutex::new(StoreState::default())),
            synchronization_active,
            reads: Arc::new(AtomicUsize::new(0)),
            begun: AtomicUsize::new(0),
            rolled_back: Arc::new(AtomicUsize::new(0)),
            faults: Arc::new(Faults::default()),
        }
    }

    /// Units of work accept synchronizations.
    pub(crate) fn transactional() -> Self {
        Self::with_synchronization(true)
    }

    /// Units of work refuse synchronizations.
    pub(crate) fn auto_commit() -> Self {
        Self::with_synchronization(false)
    }

    pub(crate) async fn rows(&self) -> Vec<TransactionRecord> {
        self.store.lock().await.rows.clone()
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    pub(crate) fn rolled_back(&self) -> usize {
        self.rolled_back.load(Ordering::SeqCst)
    }

    /// Writes report zero affected rows from now on.
    pub(crate) fn affect_no_rows(&self) {
        self.faults.no_rows.store(true, Ordering::SeqCst);
    }

    /// Lookups by identifier find nothing from now on.
    pub(crate) fn hide_inserted_rows(&self) {
        self.faults.hide_rows.store(true, Ordering::SeqCst);
    }

    /// Commits fail from now on.
    pub(crate) fn fail_commits(&self) {
        self.faults.fail_commit.store(true, Ordering::SeqCst);
    }

    fn repository(&self, state: StoreState) -> MemoryRepository {
        MemoryRepository {
            state,
            reads: Arc::clone(&self.reads),
            faults: Arc::clone(&self.faults),
        }
    }
}

#[async_trait]
impl UnitOfWorkFactory for MemoryUnitOfWorkFactory {
    async fn begin(&self) -> LedgerResult<Box<dyn UnitOfWork>> {
        self.begun.fetch_add(1, Ordering::SeqCst);
        let guard = Arc::clone(&self.store).lock_owned().await;
        let repository = self.repository(guard.clone());
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            repository,
            synchronizations: Synchronizations::new(),
            synchronization_active: self.synchronization_active,
            rolled_back: Arc::clone(&self.rolled_back),
        }))
    }

    async fn reader(&self) -> LedgerResult<Box<dyn TransactionRepository>> {
        let snapshot = self.store.lock().await.clone();
        Ok(Box::new(self.repository(snapshot)))
    }
}

/// Cache fake recording every deletion.
#[derive(Default)]
pub(crate) struct RecordingCache {
    records: Mutex<HashMap<String, TransactionRecord>>,
    total: Mutex<Option<u64>>,
    record_hits: AtomicUsize,
    deletions: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub(crate) fn put_total(&self, total: u64) {
        *self.total.lock() = Some(total);
    }

    pub(crate) fn total(&self) -> Option<u64> {
        *self.total.lock()
    }

    pub(crate) fn put_record(&self, record: TransactionRecord) {
        self.records
            .lock()
            .insert(record.transaction_id.clone(), record);
    }

    pub(crate) fn has_record(&self, transaction_id: &str) -> bool {
        self.records.lock().contains_key(transaction_id)
    }

    pub(crate) fn record_hits(&self) -> usize {
        self.record_hits.load(Ordering::SeqCst)
    }

    /// Keys deleted so far, in order.
    pub(crate) fn deletions(&self) -> Vec<String> {
        self.deletions.lock().clone()
    }

    pub(crate) fn clear_log(&self) {
        self.deletions.lock().clear();
    }
}

#[async_trait]
impl TransactionCacheInterface for RecordingCache {
    async fn get_total_count(&self) -> Option<u64> {
        self.total()
    }

    async fn set_total_count(&self, total: u64) {
        self.put_total(total);
    }

    async fn delete_total_count(&self) {
        *self.total.lock() = None;
        self.deletions
            .lock()
            .push(cache_keys::TOTAL_COUNT.to_string());
    }

    async fn get_record(&self, transaction_id: &str) -> Option<TransactionRecord> {
        let found = self.records.lock().get(transaction_id).cloned();
        if found.is_some() {
            self.record_hits.fetch_add(1, Ordering::SeqCst);
        }
        found
    }

    async fn set_record(&self, record: &TransactionRecord) {
        self.put_record(record.clone());
    }

    async fn delete_record(&self, transaction_id: &str) {
        self.records.lock().remove(transaction_id);
        self.deletions
            .lock()
            .push(cache_keys::record(transaction_id));
    }
}
