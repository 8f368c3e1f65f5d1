//! Transaction DTOs.

use chrono::{DateTime, Utc};
use ledger_core::validation::rules::not_blank;
use ledger_core::{LedgerError, LedgerResult, Page, TransactionKind, TransactionRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Create or update request.
///
/// `transaction_id` is optional on create (generated when blank) and required
/// on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEditRequest {
    #[validate(length(max = 64, message = "Transaction ID cannot exceed 64 characters"))]
    pub transaction_id: Option<String>,

    /// Amount in minor currency units.
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i32,

    /// 1 = debit, 2 = credit.
    #[validate(range(
        min = 1,
        max = 2,
        message = "Transaction type must be 1 (debit) or 2 (credit)"
    ))]
    pub transaction_type: i16,

    #[validate(
        custom(function = "not_blank", message = "Account number cannot be blank"),
        length(max = 32, message = "Account number cannot exceed 32 characters")
    )]
    pub account_number: String,

    #[validate(
        custom(function = "not_blank", message = "Counterparty account cannot be blank"),
        length(max = 32, message = "Counterparty account cannot exceed 32 characters")
    )]
    pub counterparty_account: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

impl TransactionEditRequest {
    /// Supplied business identifier, if it is not blank.
    #[must_use]
    pub fn supplied_transaction_id(&self) -> Option<&str> {
        self.transaction_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    /// Builds an unsaved record carrying `transaction_id`.
    pub fn to_record(&self, transaction_id: String) -> LedgerResult<TransactionRecord> {
        Ok(TransactionRecord::new(
            transaction_id,
            self.amount,
            TransactionKind::try_from(self.transaction_type)?,
            self.account_number.clone(),
            self.counterparty_account.clone(),
            self.description.clone(),
        ))
    }

    /// Overwrites every mutable field of `record`.
    ///
    /// An absent description clears the stored one. The business identifier and
    /// creation time are left as stored.
    pub fn apply_to(&self, record: &mut TransactionRecord) -> LedgerResult<()> {
        record.amount = self.amount;
        record.transaction_type = TransactionKind::try_from(self.transaction_type)?;
        record.account_number.clone_from(&self.account_number);
        record.counterparty_account.clone_from(&self.counterparty_account);
        record.description.clone_from(&self.description);
        record.updated_at = Utc::now();
        Ok(())
    }
}

/// Delete request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDeleteRequest {
    #[validate(custom(function = "not_blank", message = "Transaction ID cannot be blank"))]
    pub transaction_id: String,
}

/// Transaction response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    pub transaction_id: String,
    pub amount: i32,
    pub transaction_type: i16,
    pub account_number: String,
    pub counterparty_account: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            transaction_id: record.transaction_id,
            amount: record.amount,
            transaction_type: record.transaction_type.code(),
            account_number: record.account_number,
            counterparty_account: record.counterparty_account,
            description: record.description,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// One page of transactions with navigation metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPageResponse {
    pub content: Vec<TransactionResponse>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based page number.
    pub number: usize,
    pub size: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<Page<TransactionRecord>> for TransactionPageResponse {
    fn from(page: Page<TransactionRecord>) -> Self {
        let info = page.info;
        Self {
            content: page.content.into_iter().map(TransactionResponse::from).collect(),
            total_elements: info.total_elements,
            total_pages: info.total_pages,
            number: info.number,
            size: info.size,
            number_of_elements: info.number_of_elements,
            first: info.first,
            last: info.last,
            has_next: info.has_next,
            has_previous: info.has_previous,
        }
    }
}

/// Rejects an update request without a business identifier.
pub fn require_transaction_id(request: &TransactionEditRequest) -> LedgerResult<String> {
    request
        .supplied_transaction_id()
        .map(ToString::to_string)
        .ok_or_else(|| {
            LedgerError::invalid_parameter("transactionId: Transaction ID is required for updates")
        })
}
