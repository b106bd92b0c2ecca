use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{DateRange, TransactionRecord};

const TRANSACTION_COLUMNS: &str = "id, account_id, amount, balance_after, kind, description, \
     source_account, destination_account, recipient_name, recipient_account, payment_method, \
     created_at";

/// Repository for the append-only transaction ledger.
///
/// There are deliberately no update or delete methods: a record, once
/// inserted, is immutable.
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a record inside the enclosing database transaction.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        record: &TransactionRecord,
    ) -> Result<TransactionRecord> {
        let sql = format!(
            "INSERT INTO transactions (id, account_id, amount, balance_after, kind, description, \
             source_account, destination_account, recipient_name, recipient_account, \
             payment_method, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {TRANSACTION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TransactionRecord>(&sql)
            .bind(record.id)
            .bind(record.account_id)
            .bind(record.amount)
            .bind(record.balance_after)
            .bind(record.kind)
            .bind(&record.description)
            .bind(&record.source_account)
            .bind(&record.destination_account)
            .bind(&record.recipient_name)
            .bind(&record.recipient_account)
            .bind(record.payment_method)
            .bind(record.created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Transactions for one account in chronological order, optionally
    /// restricted to an inclusive calendar-date range.
    pub async fn find_by_account(
        &self,
        account_id: Uuid,
        range: Option<DateRange>,
    ) -> Result<Vec<TransactionRecord>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE account_id = $1 \
               AND ($2::date IS NULL OR created_at::date >= $2) \
               AND ($3::date IS NULL OR created_at::date <= $3) \
             ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, TransactionRecord>(&sql)
            .bind(account_id)
            .bind(range.map(|r| r.start))
            .bind(range.map(|r| r.end))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows)
    }
}
