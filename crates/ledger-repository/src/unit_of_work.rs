//! Unit of work and transaction synchronizations.
//!
//! A unit of work owns one store transaction. Callers may register
//! [`TransactionSynchronization`]s on it; `after_commit` runs only once the
//! commit has succeeded, never on rollback or drop.

use crate::TransactionRepository;
use async_trait::async_trait;
use ledger_core::{Interface, LedgerError, LedgerResult};
use tracing::debug;

/// Outcome of a unit of work, reported to `after_completion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The store transaction committed.
    Committed,
    /// The store transaction was rolled back or its commit failed.
    RolledBack,
}

/// Callback attached to a unit of work.
#[async_trait]
pub trait TransactionSynchronization: Send + Sync {
    /// Invoked after a successful commit.
    async fn after_commit(&self) {}

    /// Invoked once the unit of work has finished, whatever the outcome.
    async fn after_completion(&self, _status: CompletionStatus) {}
}

/// One store transaction scoping a workflow call.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Record store gateway bound to this unit of work's connection.
    fn transactions(&mut self) -> &mut dyn TransactionRepository;

    /// Whether synchronizations can be registered.
    fn is_synchronization_active(&self) -> bool;

    /// Registers a callback to run when the unit of work completes.
    ///
    /// Fails when synchronization is not active.
    fn register_synchronization(
        &mut self,
        synchronization: Box<dyn TransactionSynchronization>,
    ) -> LedgerResult<()>;

    /// Commits the store transaction, then runs the registered callbacks.
    async fn commit(self: Box<Self>) -> LedgerResult<()>;

    /// Rolls back the store transaction. `after_commit` never runs.
    async fn rollback(self: Box<Self>) -> LedgerResult<()>;
}

/// Factory for units of work and read-only gateways.
#[async_trait]
pub trait UnitOfWorkFactory: Interface + Send + Sync {
    /// Opens a new unit of work.
    async fn begin(&self) -> LedgerResult<Box<dyn UnitOfWork>>;

    /// Returns a gateway for reads outside any unit of work.
    async fn reader(&self) -> LedgerResult<Box<dyn TransactionRepository>>;
}

/// Ordered list of synchronizations registered on a unit of work.
#[derive(Default)]
pub struct Synchronizations {
    entries: Vec<Box<dyn TransactionSynchronization>>,
}

impl Synchronizations {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a synchronization.
    pub fn register(&mut self, synchronization: Box<dyn TransactionSynchronization>) {
        self.entries.push(synchronization);
    }

    /// Number of registered synchronizations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs `after_commit` in registration order, then `after_completion(Committed)`.
    pub async fn trigger_committed(self) {
        debug!("Running {} post-commit synchronization(s)", self.entries.len());
        for entry in &self.entries {
            entry.after_commit().await;
        }
        for entry in &self.entries {
            entry.after_completion(CompletionStatus::Committed).await;
        }
    }

    /// Runs `after_completion(RolledBack)` in registration order.
    pub async fn trigger_rolled_back(self) {
        for entry in &self.entries {
            entry.after_completion(CompletionStatus::RolledBack).await;
        }
    }
}

impl std::fmt::Debug for Synchronizations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizations")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Error returned when registering on a unit of work without synchronization.
#[must_use]
pub fn synchronization_inactive() -> LedgerError {
    LedgerError::internal("transaction synchronization is not active")
}
