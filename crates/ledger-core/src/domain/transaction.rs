//! Transaction record entity.

use crate::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum TransactionKind {
    /// Money leaving the account.
    Debit = 1,
    /// Money entering the account.
    Credit = 2,
}

impl TransactionKind {
    /// Returns the persisted integer code.
    #[must_use]
    pub const fn code(self) -> i16 {
        self as i16
    }

    /// All kinds.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Debit, Self::Credit]
    }
}

impl TryFrom<i16> for TransactionKind {
    type Error = LedgerError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Debit),
            2 => Ok(Self::Credit),
            other => Err(LedgerError::invalid_parameter(format!(
                "transaction type must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<TransactionKind> for i16 {
    fn from(kind: TransactionKind) -> Self {
        kind.code()
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
        }
    }
}

/// A single financial transaction, addressed by its business identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Store-assigned row id; zero until inserted.
    pub id: i64,

    /// Business identifier, globally unique and immutable.
    pub transaction_id: String,

    /// Amount in minor currency units.
    pub amount: i32,

    pub transaction_type: TransactionKind,

    pub account_number: String,

    pub counterparty_account: String,

    pub description: Option<String>,

    /// Store-managed creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Store-managed modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Creates a record that has not been persisted yet.
    #[must_use]
    pub fn new(
        transaction_id: String,
        amount: i32,
        transaction_type: TransactionKind,
        account_number: String,
        counterparty_account: String,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            transaction_id,
            amount,
            transaction_type,
            account_number,
            counterparty_account,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks whether the record has been assigned a row id by the store.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id > 0
    }
}
