//! MySQL transaction record gateway.

use crate::traits::TransactionRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger_core::{LedgerError, LedgerResult, TransactionKind, TransactionRecord};
use sqlx::{FromRow, MySqlConnection};
use std::ops::DerefMut;
use tracing::debug;

const SELECT_COLUMNS: &str = r"
    SELECT id, transaction_id, amount, transaction_type, account_number,
           counterparty_account, description, created_at, updated_at
    FROM transactions
";

/// MySQL gateway running on a borrowed connection handle.
///
/// `C` is anything that dereferences to a [`MySqlConnection`]: a
/// `sqlx::Transaction` for writes, or a pooled connection for reads.
pub struct MySqlTransactionRepository<C> {
    conn: C,
}

impl<C> MySqlTransactionRepository<C>
where
    C: DerefMut<Target = MySqlConnection> + Send,
{
    /// Creates a gateway over the given connection handle.
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Releases the connection handle.
    pub fn into_inner(self) -> C {
        self.conn
    }
}

/// Database row representation of a transaction record.
#[derive(Debug, FromRow)]
struct TransactionRow {
    id: i64,
    transaction_id: String,
    amount: i32,
    transaction_type: i8,
    account_number: String,
    counterparty_account: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for TransactionRecord {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(TransactionRecord {
            id: row.id,
            transaction_id: row.transaction_id,
            amount: row.amount,
            transaction_type: TransactionKind::try_from(i16::from(row.transaction_type))?,
            account_number: row.account_number,
            counterparty_account: row.counterparty_account,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_records(rows: Vec<TransactionRow>) -> LedgerResult<Vec<TransactionRecord>> {
    rows.into_iter().map(TransactionRecord::try_from).collect()
}

#[async_trait]
impl<C> TransactionRepository for MySqlTransactionRepository<C>
where
    C: DerefMut<Target = MySqlConnection> + Send,
{
    async fn insert(&mut self, record: &TransactionRecord) -> LedgerResult<u64> {
        debug!("Inserting transaction: {}", record.transaction_id);

        let result = sqlx::query(
            r"
            INSERT INTO transactions
                (transaction_id, amount, transaction_type, account_number,
                 counterparty_account, description)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&record.transaction_id)
        .bind(record.amount)
        .bind(record.transaction_type.code())
        .bind(&record.account_number)
        .bind(&record.counterparty_account)
        .bind(&record.description)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_transaction_id(&mut self, transaction_id: &str) -> LedgerResult<u64> {
        debug!("Deleting transaction: {}", transaction_id);

        let result = sqlx::query("DELETE FROM transactions WHERE transaction_id = ?")
            .bind(transaction_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update(&mut self, record: &TransactionRecord) -> LedgerResult<u64> {
        debug!("Updating transaction: {}", record.transaction_id);

        let result = sqlx::query(
            r"
            UPDATE transactions
            SET amount = ?, transaction_type = ?, account_number = ?,
                counterparty_account = ?, description = ?
            WHERE transaction_id = ?
            ",
        )
        .bind(record.amount)
        .bind(record.transaction_type.code())
        .bind(&record.account_number)
        .bind(&record.counterparty_account)
        .bind(&record.description)
        .bind(&record.transaction_id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_by_transaction_id(
        &mut self,
        transaction_id: &str,
    ) -> LedgerResult<Option<TransactionRecord>> {
        debug!("Finding transaction by id: {}", transaction_id);

        let sql = format!("{SELECT_COLUMNS} WHERE transaction_id = ?");
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(transaction_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        row.map(TransactionRecord::try_from).transpose()
    }

    async fn exists_by_transaction_id(&mut self, transaction_id: &str) -> LedgerResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE transaction_id = ?")
                .bind(transaction_id)
                .fetch_one(&mut *self.conn)
                .await?;

        Ok(count > 0)
    }

    async fn find_page(&mut self, offset: u64, limit: u64) -> LedgerResult<Vec<TransactionRecord>> {
        debug!("Finding transactions, offset: {}, limit: {}", offset, limit);

        let sql = format!("{SELECT_COLUMNS} ORDER BY id ASC LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *self.conn)
            .await?;

        into_records(rows)
    }

    async fn count_total(&mut self) -> LedgerResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&mut *self.conn)
            .await?;

        u64::try_from(total).map_err(|e| LedgerError::internal(format!("Invalid row count: {e}")))
    }
}
