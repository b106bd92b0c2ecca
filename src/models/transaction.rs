use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Category of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money paid into the account by its owner.
    Deposit,
    /// Money taken out of the account by its owner.
    Withdrawal,
    /// Movement between two accounts inside the bank.
    Transfer,
    /// Payment to or from a third party.
    Payment,
}

impl TransactionKind {
    /// Lowercase label used in log fields and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Payment => "payment",
        }
    }
}

/// How a third-party payment is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    BankAccount,
}

/// An append-only ledger entry against one account.
///
/// Records are never updated or deleted once created; `balance_after` is the
/// account balance snapshot taken at creation time. The transfer and payment
/// fields are populated only for entries of the matching kind.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Always positive; direction is carried by the kind and the entry's side.
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub kind: TransactionKind,
    pub description: String,
    pub source_account: Option<String>,
    pub destination_account: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_account: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    fn base(
        account_id: Uuid,
        amount: Decimal,
        balance_after: Decimal,
        kind: TransactionKind,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            balance_after,
            kind,
            description,
            source_account: None,
            destination_account: None,
            recipient_name: None,
            recipient_account: None,
            payment_method: None,
            created_at: Utc::now(),
        }
    }

    pub fn deposit(
        account_id: Uuid,
        amount: Decimal,
        balance_after: Decimal,
        description: String,
    ) -> Self {
        Self::base(
            account_id,
            amount,
            balance_after,
            TransactionKind::Deposit,
            description,
        )
    }

    pub fn withdrawal(
        account_id: Uuid,
        amount: Decimal,
        balance_after: Decimal,
        description: String,
    ) -> Self {
        Self::base(
            account_id,
            amount,
            balance_after,
            TransactionKind::Withdrawal,
            description,
        )
    }

    /// Transfer entry for either side; carries both account numbers so each
    /// side's statement shows where the money came from and went to.
    pub fn transfer(
        account_id: Uuid,
        amount: Decimal,
        balance_after: Decimal,
        source_account: String,
        destination_account: String,
        description: String,
    ) -> Self {
        let mut record = Self::base(
            account_id,
            amount,
            balance_after,
            TransactionKind::Transfer,
            description,
        );
        record.source_account = Some(source_account);
        record.destination_account = Some(destination_account);
        record
    }

    /// Payer-side payment entry.
    pub fn payment_sent(
        account_id: Uuid,
        amount: Decimal,
        balance_after: Decimal,
        recipient_name: String,
        recipient_account: String,
        payment_method: PaymentMethod,
        description: String,
    ) -> Self {
        let mut record = Self::base(
            account_id,
            amount,
            balance_after,
            TransactionKind::Payment,
            description,
        );
        record.recipient_name = Some(recipient_name);
        record.recipient_account = Some(recipient_account);
        record.payment_method = Some(payment_method);
        record
    }

    /// Recipient-side payment entry.
    pub fn payment_received(
        account_id: Uuid,
        amount: Decimal,
        balance_after: Decimal,
        description: String,
    ) -> Self {
        Self::base(
            account_id,
            amount,
            balance_after,
            TransactionKind::Payment,
            description,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_labels() {
        assert_eq!(TransactionKind::Deposit.label(), "deposit");
        assert_eq!(TransactionKind::Withdrawal.label(), "withdrawal");
        assert_eq!(TransactionKind::Transfer.label(), "transfer");
        assert_eq!(TransactionKind::Payment.label(), "payment");
    }

    #[test]
    fn test_deposit_record() {
        let account_id = Uuid::new_v4();
        let record =
            TransactionRecord::deposit(account_id, dec!(500), dec!(1500), "cash".to_string());

        assert_eq!(record.account_id, account_id);
        assert_eq!(record.kind, TransactionKind::Deposit);
        assert_eq!(record.amount, dec!(500));
        assert_eq!(record.balance_after, dec!(1500));
        assert!(record.source_account.is_none());
        assert!(record.payment_method.is_none());
    }

    #[test]
    fn test_transfer_record_carries_both_account_numbers() {
        let record = TransactionRecord::transfer(
            Uuid::new_v4(),
            dec!(200),
            dec!(800),
            "1001".to_string(),
            "1002".to_string(),
            "rent".to_string(),
        );

        assert_eq!(record.kind, TransactionKind::Transfer);
        assert_eq!(record.source_account.as_deref(), Some("1001"));
        assert_eq!(record.destination_account.as_deref(), Some("1002"));
    }

    #[test]
    fn test_payment_sent_record() {
        let record = TransactionRecord::payment_sent(
            Uuid::new_v4(),
            dec!(75.25),
            dec!(424.75),
            "Acme Utilities".to_string(),
            "2002".to_string(),
            PaymentMethod::BankAccount,
            "electricity bill".to_string(),
        );

        assert_eq!(record.kind, TransactionKind::Payment);
        assert_eq!(record.recipient_name.as_deref(), Some("Acme Utilities"));
        assert_eq!(record.recipient_account.as_deref(), Some("2002"));
        assert_eq!(record.payment_method, Some(PaymentMethod::BankAccount));
    }

    #[test]
    fn test_payment_received_record_is_minimal() {
        let record = TransactionRecord::payment_received(
            Uuid::new_v4(),
            dec!(75.25),
            dec!(575.25),
            "Received payment from account 1001".to_string(),
        );

        assert_eq!(record.kind, TransactionKind::Payment);
        assert!(record.recipient_name.is_none());
        assert!(record.recipient_account.is_none());
    }

    #[test]
    fn test_serialization() {
        let record = TransactionRecord::withdrawal(
            Uuid::new_v4(),
            dec!(120.50),
            dec!(879.50),
            "atm".to_string(),
        );

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: TransactionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.amount, dec!(120.50));
        assert_eq!(deserialized.kind, TransactionKind::Withdrawal);
    }
}
