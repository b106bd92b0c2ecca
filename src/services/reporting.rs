use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::{Account, DateRange, TransactionRecord};
use crate::observability::get_metrics;
use crate::repositories::{AccountRepository, TransactionRepository};

/// Read side of the ledger: account statements.
pub struct ReportingService {
    accounts: AccountRepository,
    transactions: TransactionRepository,
}

impl ReportingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool),
        }
    }

    /// Looks up an account by number.
    pub async fn account(&self, account_no: &str) -> Result<Account> {
        self.accounts
            .find_by_account_no(account_no)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", account_no)))
    }

    /// Transactions for one account in chronological order, optionally
    /// restricted to an inclusive calendar-date range.
    pub async fn statement(
        &self,
        account_no: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<TransactionRecord>> {
        let account = self.account(account_no).await?;

        get_metrics().record_statement_query(range.is_some());

        self.transactions.find_by_account(account.id, range).await
    }

    /// Statement filtered by a textual range, e.g.
    /// `"2024-01-01 - 2024-01-31"`.
    pub async fn statement_for_range(
        &self,
        account_no: &str,
        range: &str,
    ) -> Result<Vec<TransactionRecord>> {
        let range: DateRange = range.parse()?;
        self.statement(account_no, Some(range)).await
    }
}
