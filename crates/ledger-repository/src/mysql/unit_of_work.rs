//! MySQL units of work.

use super::MySqlTransactionRepository;
use crate::unit_of_work::{synchronization_inactive, Synchronizations};
use crate::{
    DatabasePoolInterface, TransactionRepository, TransactionSynchronization, UnitOfWork,
    UnitOfWorkFactory,
};
use async_trait::async_trait;
use ledger_core::LedgerResult;
use shaku::Component;
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlPool, Transaction};
use std::sync::Arc;
use tracing::{debug, warn};

/// Unit of work backed by one `sqlx` transaction.
pub struct MySqlUnitOfWork {
    repository: MySqlTransactionRepository<Transaction<'static, MySql>>,
    synchronizations: Synchronizations,
}

impl MySqlUnitOfWork {
    /// Begins a transaction on the pool.
    pub async fn begin(pool: &MySqlPool) -> LedgerResult<Self> {
        let tx = pool.begin().await?;
        debug!("Began database transaction");
        Ok(Self {
            repository: MySqlTransactionRepository::new(tx),
            synchronizations: Synchronizations::new(),
        })
    }
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    fn transactions(&mut self) -> &mut dyn TransactionRepository {
        &mut self.repository
    }

    fn is_synchronization_active(&self) -> bool {
        true
    }

    fn register_synchronization(
        &mut self,
        synchronization: Box<dyn TransactionSynchronization>,
    ) -> LedgerResult<()> {
        self.synchronizations.register(synchronization);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> LedgerResult<()> {
        let Self {
            repository,
            synchronizations,
        } = *self;

        match repository.into_inner().commit().await {
            Ok(()) => {
                debug!("Committed database transaction");
                synchronizations.trigger_committed().await;
                Ok(())
            }
            Err(e) => {
                warn!("Commit failed: {}", e);
                synchronizations.trigger_rolled_back().await;
                Err(e.into())
            }
        }
    }

    async fn rollback(self: Box<Self>) -> LedgerResult<()> {
        let Self {
            repository,
            synchronizations,
        } = *self;

        let result = repository.into_inner().rollback().await;
        debug!("Rolled back database transaction");
        synchronizations.trigger_rolled_back().await;
        result.map_err(Into::into)
    }
}

/// Unit of work without an enclosing transaction.
///
/// Every statement commits on its own, so there is nothing to synchronize
/// with and registration is refused.
pub struct AutoCommitUnitOfWork {
    repository: MySqlTransactionRepository<PoolConnection<MySql>>,
}

impl AutoCommitUnitOfWork {
    /// Acquires a pooled connection.
    pub async fn acquire(pool: &MySqlPool) -> LedgerResult<Self> {
        let conn = pool.acquire().await?;
        Ok(Self {
            repository: MySqlTransactionRepository::new(conn),
        })
    }
}

#[async_trait]
impl UnitOfWork for AutoCommitUnitOfWork {
    fn transactions(&mut self) -> &mut dyn TransactionRepository {
        &mut self.repository
    }

    fn is_synchronization_active(&self) -> bool {
        false
    }

    fn register_synchronization(
        &mut self,
        _synchronization: Box<dyn TransactionSynchronization>,
    ) -> LedgerResult<()> {
        Err(synchronization_inactive())
    }

    async fn commit(self: Box<Self>) -> LedgerResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> LedgerResult<()> {
        debug!("Auto-commit unit of work has nothing to roll back");
        Ok(())
    }
}

/// Opens units of work on the shared pool.
#[derive(Component)]
#[shaku(interface = UnitOfWorkFactory)]
pub struct MySqlUnitOfWorkFactory {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,

    /// Wrap writes in a database transaction.
    #[shaku(default = true)]
    transactional: bool,
}

impl MySqlUnitOfWorkFactory {
    /// Creates a new factory.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>, transactional: bool) -> Self {
        Self {
            pool,
            transactional,
        }
    }
}

#[async_trait]
impl UnitOfWorkFactory for MySqlUnitOfWorkFactory {
    async fn begin(&self) -> LedgerResult<Box<dyn UnitOfWork>> {
        if self.transactional {
            Ok(Box::new(MySqlUnitOfWork::begin(self.pool.inner()).await?))
        } else {
            Ok(Box::new(AutoCommitUnitOfWork::acquire(self.pool.inner()).await?))
        }
    }

    async fn reader(&self) -> LedgerResult<Box<dyn TransactionRepository>> {
        let conn = self.pool.inner().acquire().await?;
        Ok(Box::new(MySqlTransactionRepository::new(conn)))
    }
}
