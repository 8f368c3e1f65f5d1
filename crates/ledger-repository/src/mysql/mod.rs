//! MySQL repository implementations.

mod transaction_repository;
mod unit_of_work;

pub use transaction_repository::MySqlTransactionRepository;
pub use unit_of_work::{
    AutoCommitUnitOfWork, MySqlUnitOfWork, MySqlUnitOfWorkFactory, MySqlUnitOfWorkFactoryParameters,
};
