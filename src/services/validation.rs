use rust_decimal::Decimal;

use crate::config::LimitSettings;
use crate::error::{AppError, Result};

/// Stateless amount policy for the four money-moving operations.
///
/// Constructed from the process-wide limits; per-account maximums come from
/// the account's product and are passed per call. Every rejection names the
/// exact bound that was violated, since these messages are user-facing.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    limits: LimitSettings,
}

impl ValidationRules {
    pub fn new(limits: LimitSettings) -> Self {
        Self { limits }
    }

    /// Deposits only have a lower bound.
    pub fn validate_deposit(&self, amount: Decimal) -> Result<Decimal> {
        check_minimum("deposit", amount, self.limits.minimum_deposit_amount)?;
        Ok(amount)
    }

    pub fn validate_withdrawal(
        &self,
        amount: Decimal,
        maximum: Decimal,
        balance: Decimal,
    ) -> Result<Decimal> {
        check_minimum("withdraw", amount, self.limits.minimum_withdrawal_amount)?;
        check_maximum("withdraw", amount, maximum)?;
        check_balance(amount, balance)?;
        Ok(amount)
    }

    pub fn validate_transfer(
        &self,
        amount: Decimal,
        maximum: Decimal,
        balance: Decimal,
    ) -> Result<Decimal> {
        check_minimum("transfer", amount, self.limits.minimum_transfer_amount)?;
        check_maximum("transfer", amount, maximum)?;
        check_balance(amount, balance)?;
        Ok(amount)
    }

    /// Payments share the withdrawal minimum.
    pub fn validate_payment(
        &self,
        amount: Decimal,
        maximum: Decimal,
        balance: Decimal,
    ) -> Result<Decimal> {
        check_minimum("pay", amount, self.limits.minimum_withdrawal_amount)?;
        check_maximum("pay", amount, maximum)?;
        check_balance(amount, balance)?;
        Ok(amount)
    }

    /// Deposit-application fields must all be strictly positive.
    pub fn validate_positive_amount(field: &str, value: Decimal) -> Result<Decimal> {
        if value <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "The {} must be a positive number, got {}",
                field, value
            )));
        }
        Ok(value)
    }

    pub fn validate_positive_months(field: &str, value: i32) -> Result<i32> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "The {} must be a positive number of months, got {}",
                field, value
            )));
        }
        Ok(value)
    }
}

fn check_minimum(operation: &str, amount: Decimal, minimum: Decimal) -> Result<()> {
    if amount < minimum {
        return Err(AppError::Validation(format!(
            "You can {} at least {}, got {}",
            operation, minimum, amount
        )));
    }
    Ok(())
}

fn check_maximum(operation: &str, amount: Decimal, maximum: Decimal) -> Result<()> {
    if amount > maximum {
        return Err(AppError::Validation(format!(
            "You can {} at most {}, got {}",
            operation, maximum, amount
        )));
    }
    Ok(())
}

fn check_balance(amount: Decimal, balance: Decimal) -> Result<()> {
    if amount > balance {
        return Err(AppError::Validation(format!(
            "Insufficient funds: requested {}, available {}",
            amount, balance
        )));
    }
    Ok(())
}
