//! # Ledger Repository
//!
//! Record store gateway for transaction records plus the unit of work that
//! scopes each write to one database transaction.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UnitOfWorkFactory>
//! MySqlUnitOfWorkFactory         (begins a MySqlUnitOfWork or AutoCommitUnitOfWork)
//!   ↓  &mut dyn TransactionRepository
//! MySqlTransactionRepository<C>  (runs on the unit of work's connection)
//!   ↓
//! MySQL
//! ```
//!
//! Synchronizations registered on a unit of work run only after its commit
//! succeeds.

pub mod mysql;
pub mod pool;
pub mod traits;
pub mod unit_of_work;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
pub use unit_of_work::*;
