use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Account, AccountProduct};

const ACCOUNT_COLUMNS: &str = "id, account_no, user_id, product_id, balance, \
     initial_deposit_date, interest_start_date, created_at, updated_at";

/// Repository for accounts and account products.
///
/// Methods taking a `PgConnection` run against an open database transaction;
/// the ledger engine composes them into a single atomic unit. Updates are
/// field-scoped: only the named columns are written.
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new account product.
    pub async fn create_product(&self, product: &AccountProduct) -> Result<AccountProduct> {
        let row = sqlx::query_as::<_, AccountProduct>(
            r#"
            INSERT INTO account_products (id, name, maximum_withdrawal_amount, interest_calculation_per_year, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, maximum_withdrawal_amount, interest_calculation_per_year, created_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.maximum_withdrawal_amount)
        .bind(product.interest_calculation_per_year)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Finds an account product by id.
    pub async fn find_product(&self, id: Uuid) -> Result<Option<AccountProduct>> {
        let row = sqlx::query_as::<_, AccountProduct>(
            r#"
            SELECT id, name, maximum_withdrawal_amount, interest_calculation_per_year, created_at
            FROM account_products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Creates a new account.
    pub async fn create(&self, account: &Account) -> Result<Account> {
        let sql = format!(
            "INSERT INTO accounts (id, account_no, user_id, product_id, balance, \
             initial_deposit_date, interest_start_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(account.id)
            .bind(&account.account_no)
            .bind(account.user_id)
            .bind(account.product_id)
            .bind(account.balance)
            .bind(account.initial_deposit_date)
            .bind(account.interest_start_date)
            .bind(account.created_at)
            .bind(account.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Finds an account by its UUID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Finds an account by its account number.
    pub async fn find_by_account_no(&self, account_no: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_no = $1");
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(account_no)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Locks the account row for the duration of the enclosing transaction
    /// and returns the current state. Concurrent writers against the same
    /// account serialize on this lock.
    pub async fn lock_by_account_no(
        &self,
        conn: &mut PgConnection,
        account_no: &str,
    ) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_no = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(account_no)
            .fetch_optional(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Persists a balance change. Writes `balance` and `updated_at` only.
    pub async fn update_balance(
        &self,
        conn: &mut PgConnection,
        account: &Account,
    ) -> Result<Account> {
        let sql = format!(
            "UPDATE accounts SET balance = $2, updated_at = $3 WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(account.id)
            .bind(account.balance)
            .bind(account.updated_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Persists a balance change together with the first-deposit dates.
    pub async fn update_balance_and_deposit_dates(
        &self,
        conn: &mut PgConnection,
        account: &Account,
    ) -> Result<Account> {
        let sql = format!(
            "UPDATE accounts \
             SET balance = $2, initial_deposit_date = $3, interest_start_date = $4, updated_at = $5 \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(account.id)
            .bind(account.balance)
            .bind(account.initial_deposit_date)
            .bind(account.interest_start_date)
            .bind(account.updated_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }
}
