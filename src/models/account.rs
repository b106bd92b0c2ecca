use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Product configuration attached to a bank account.
///
/// Defines the per-transaction withdrawal cap and how many times per year
/// interest is calculated for accounts of this product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountProduct {
    pub id: Uuid,
    pub name: String,
    pub maximum_withdrawal_amount: Decimal,
    pub interest_calculation_per_year: i32,
    pub created_at: DateTime<Utc>,
}

impl AccountProduct {
    pub fn new(
        name: String,
        maximum_withdrawal_amount: Decimal,
        interest_calculation_per_year: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            maximum_withdrawal_amount,
            interest_calculation_per_year,
            created_at: Utc::now(),
        }
    }

    /// Months between interest calculations.
    pub fn interest_interval_months(&self) -> u32 {
        (12 / self.interest_calculation_per_year.max(1)) as u32
    }
}

/// A user bank account.
///
/// The balance is only ever mutated through the ledger engine; the entity
/// methods below carry the arithmetic and its invariants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub account_no: String,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub balance: Decimal,
    /// Set exactly once, on the first deposit into the account.
    pub initial_deposit_date: Option<DateTime<Utc>>,
    pub interest_start_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with a zero balance.
    pub fn new(account_no: String, user_id: Uuid, product_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_no,
            user_id,
            product_id,
            balance: Decimal::ZERO,
            initial_deposit_date: None,
            interest_start_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_sufficient_funds(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Increases the balance.
    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
        self.updated_at = Utc::now();
    }

    /// Decreases the balance. Fails without mutating if the balance would go
    /// negative.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), InsufficientFundsError> {
        if !self.has_sufficient_funds(amount) {
            return Err(InsufficientFundsError {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Stamps the first-deposit bookkeeping dates.
    ///
    /// Returns true if the dates were set; false if a deposit was already
    /// recorded (the dates are write-once). The interest start date is the
    /// deposit time plus one interest interval of the account's product.
    pub fn record_first_deposit(&mut self, now: DateTime<Utc>, product: &AccountProduct) -> bool {
        if self.initial_deposit_date.is_some() {
            return false;
        }
        self.initial_deposit_date = Some(now);
        self.interest_start_date = Some(now + Months::new(product.interest_interval_months()));
        true
    }
}

#[derive(Debug, Clone, Error)]
#[error("insufficient funds: requested {requested}, available {available}")]
pub struct InsufficientFundsError {
    pub requested: Decimal,
    pub available: Decimal,
}
