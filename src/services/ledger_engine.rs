use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Account, AccountProduct, PaymentMethod, TransactionRecord};
use crate::observability::{get_metrics, mask_account_no, mask_amount, LatencyTimer};
use crate::repositories::{AccountRepository, TransactionRepository};
use crate::services::validation::ValidationRules;

/// Outcome of a single-account ledger operation (deposit or withdrawal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerOutcome {
    pub account: Account,
    pub record: TransactionRecord,
}

/// Outcome of a transfer between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub source: Account,
    pub destination: Account,
    pub outgoing: TransactionRecord,
    pub incoming: TransactionRecord,
}

/// Outcome of a third-party payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub payer: Account,
    pub recipient: Account,
    pub sent: TransactionRecord,
    pub received: TransactionRecord,
}

/// Instruction for a third-party payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInstruction {
    pub recipient_account: String,
    pub recipient_name: String,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub description: String,
}

/// The money mover.
///
/// Every operation runs as one database transaction: the touched account
/// rows are locked with `SELECT ... FOR UPDATE`, amounts are validated
/// against the locked balance, balances are written, and exactly one ledger
/// record is appended per affected account. An error anywhere before commit
/// rolls the whole operation back, so no partial balance change can survive.
///
/// Operations touching two accounts acquire both row locks in ascending
/// account-number order, whichever direction the money flows, so two
/// concurrent transfers between the same pair cannot deadlock.
pub struct LedgerEngine {
    pool: PgPool,
    accounts: AccountRepository,
    transactions: TransactionRepository,
    rules: ValidationRules,
}

impl LedgerEngine {
    pub fn new(pool: PgPool, rules: ValidationRules) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool.clone()),
            pool,
            rules,
        }
    }

    /// Deposits `amount` into the account.
    ///
    /// The first deposit ever made into an account also stamps
    /// `initial_deposit_date` and schedules `interest_start_date` one
    /// interest interval later.
    pub async fn deposit(
        &self,
        account_no: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<LedgerOutcome> {
        let timer = LatencyTimer::new();
        let result = self.deposit_inner(account_no, amount, description).await;
        self.finish("deposit", account_no, &amount, timer, &result);
        result
    }

    async fn deposit_inner(
        &self,
        account_no: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<LedgerOutcome> {
        let amount = self.rules.validate_deposit(amount)?;
        let product = self.product_for(account_no).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let mut account = self
            .accounts
            .lock_by_account_no(&mut tx, account_no)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", account_no)))?;

        let first_deposit = account.record_first_deposit(Utc::now(), &product);
        account.credit(amount);

        let account = if first_deposit {
            self.accounts
                .update_balance_and_deposit_dates(&mut tx, &account)
                .await?
        } else {
            self.accounts.update_balance(&mut tx, &account).await?
        };

        let record = self
            .transactions
            .insert(
                &mut tx,
                &TransactionRecord::deposit(
                    account.id,
                    amount,
                    account.balance,
                    description.to_string(),
                ),
            )
            .await?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(LedgerOutcome { account, record })
    }

    /// Withdraws `amount` from the account.
    pub async fn withdraw(
        &self,
        account_no: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<LedgerOutcome> {
        let timer = LatencyTimer::new();
        let result = self.withdraw_inner(account_no, amount, description).await;
        self.finish("withdrawal", account_no, &amount, timer, &result);
        result
    }

    async fn withdraw_inner(
        &self,
        account_no: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<LedgerOutcome> {
        let product = self.product_for(account_no).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let mut account = self
            .accounts
            .lock_by_account_no(&mut tx, account_no)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", account_no)))?;

        let amount = self.rules.validate_withdrawal(
            amount,
            product.maximum_withdrawal_amount,
            account.balance,
        )?;
        account
            .debit(amount)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let account = self.accounts.update_balance(&mut tx, &account).await?;

        let record = self
            .transactions
            .insert(
                &mut tx,
                &TransactionRecord::withdrawal(
                    account.id,
                    amount,
                    account.balance,
                    description.to_string(),
                ),
            )
            .await?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(LedgerOutcome { account, record })
    }

    /// Moves `amount` from one account to another.
    ///
    /// Both sides receive a ledger record carrying both account numbers. A
    /// missing destination fails the whole operation with no balance change.
    pub async fn transfer(
        &self,
        source_no: &str,
        destination_no: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<TransferOutcome> {
        let timer = LatencyTimer::new();
        let result = self
            .transfer_inner(source_no, destination_no, amount, description)
            .await;
        self.finish("transfer", source_no, &amount, timer, &result);
        result
    }

    async fn transfer_inner(
        &self,
        source_no: &str,
        destination_no: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<TransferOutcome> {
        if source_no == destination_no {
            return Err(AppError::Validation(
                "Source and destination accounts cannot be the same".to_string(),
            ));
        }

        let product = self.product_for(source_no).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let (mut source, mut destination) = self
            .lock_pair(&mut tx, source_no, destination_no)
            .await?;

        let amount = self.rules.validate_transfer(
            amount,
            product.maximum_withdrawal_amount,
            source.balance,
        )?;
        source
            .debit(amount)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        destination.credit(amount);

        let source = self.accounts.update_balance(&mut tx, &source).await?;
        let destination = self.accounts.update_balance(&mut tx, &destination).await?;

        let outgoing = self
            .transactions
            .insert(
                &mut tx,
                &TransactionRecord::transfer(
                    source.id,
                    amount,
                    source.balance,
                    source_no.to_string(),
                    destination_no.to_string(),
                    description.to_string(),
                ),
            )
            .await?;

        let incoming = self
            .transactions
            .insert(
                &mut tx,
                &TransactionRecord::transfer(
                    destination.id,
                    amount,
                    destination.balance,
                    source_no.to_string(),
                    destination_no.to_string(),
                    description.to_string(),
                ),
            )
            .await?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(TransferOutcome {
            source,
            destination,
            outgoing,
            incoming,
        })
    }

    /// Pays a third party from the payer's account.
    pub async fn pay(
        &self,
        payer_no: &str,
        instruction: PaymentInstruction,
    ) -> Result<PaymentOutcome> {
        let timer = LatencyTimer::new();
        let amount = instruction.amount;
        let result = self.pay_inner(payer_no, instruction).await;
        self.finish("payment", payer_no, &amount, timer, &result);
        result
    }

    async fn pay_inner(
        &self,
        payer_no: &str,
        instruction: PaymentInstruction,
    ) -> Result<PaymentOutcome> {
        if payer_no == instruction.recipient_account {
            return Err(AppError::Validation(
                "You cannot make a payment to your own account".to_string(),
            ));
        }

        let product = self.product_for(payer_no).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let (mut payer, mut recipient) = self
            .lock_pair(&mut tx, payer_no, &instruction.recipient_account)
            .await?;

        let amount = self.rules.validate_payment(
            instruction.amount,
            product.maximum_withdrawal_amount,
            payer.balance,
        )?;
        payer
            .debit(amount)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        recipient.credit(amount);

        let payer = self.accounts.update_balance(&mut tx, &payer).await?;
        let recipient = self.accounts.update_balance(&mut tx, &recipient).await?;

        let sent = self
            .transactions
            .insert(
                &mut tx,
                &TransactionRecord::payment_sent(
                    payer.id,
                    amount,
                    payer.balance,
                    instruction.recipient_name.clone(),
                    instruction.recipient_account.clone(),
                    instruction.payment_method,
                    instruction.description.clone(),
                ),
            )
            .await?;

        let received = self
            .transactions
            .insert(
                &mut tx,
                &TransactionRecord::payment_received(
                    recipient.id,
                    amount,
                    recipient.balance,
                    format!("Received payment from account {}", payer_no),
                ),
            )
            .await?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(PaymentOutcome {
            payer,
            recipient,
            sent,
            received,
        })
    }

    /// Loads the product configuration for an account's withdrawal cap and
    /// interest interval. Products are immutable, so this read can safely
    /// happen before the row locks are taken.
    async fn product_for(&self, account_no: &str) -> Result<AccountProduct> {
        let account = self
            .accounts
            .find_by_account_no(account_no)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", account_no)))?;

        self.accounts
            .find_product(account.product_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "account '{}' references missing product '{}'",
                    account_no,
                    account.product_id
                ))
            })
    }

    /// Locks two account rows in ascending account-number order and returns
    /// them as (first_no's account, second_no's account).
    async fn lock_pair(
        &self,
        conn: &mut sqlx::PgConnection,
        first_no: &str,
        second_no: &str,
    ) -> Result<(Account, Account)> {
        let (lower, upper) = if first_no < second_no {
            (first_no, second_no)
        } else {
            (second_no, first_no)
        };

        let lower_account = self
            .accounts
            .lock_by_account_no(conn, lower)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", lower)))?;
        let upper_account = self
            .accounts
            .lock_by_account_no(conn, upper)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account '{}' not found", upper)))?;

        if lower_account.account_no == first_no {
            Ok((lower_account, upper_account))
        } else {
            Ok((upper_account, lower_account))
        }
    }

    fn finish<T>(
        &self,
        operation: &'static str,
        account_no: &str,
        amount: &Decimal,
        timer: LatencyTimer,
        result: &Result<T>,
    ) {
        let metrics = get_metrics();
        metrics.record_ledger_write_latency(timer.elapsed_ms());
        match result {
            Ok(_) => {
                metrics.record_ledger_operation(operation);
                info!(
                    operation,
                    account = %mask_account_no(account_no),
                    amount = %mask_amount(amount),
                    "ledger operation committed"
                );
            }
            Err(e) => {
                metrics.record_ledger_failure(operation, e.reason());
                info!(
                    operation,
                    account = %mask_account_no(account_no),
                    reason = e.reason(),
                    "ledger operation rejected"
                );
            }
        }
    }
}
