use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Deposit product a user can apply for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "deposit_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositKind {
    /// Lump sum locked for the tenure.
    Fixed,
    /// Fixed monthly instalments accumulating over the tenure.
    Recurring,
}

impl DepositKind {
    pub fn label(&self) -> &'static str {
        match self {
            DepositKind::Fixed => "fixed",
            DepositKind::Recurring => "recurring",
        }
    }
}

/// Lifecycle status of a deposit application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Awaiting an admin decision.
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Approved and Rejected are terminal; no further decisions are allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// A fixed- or recurring-deposit application.
///
/// Created Pending by a user submission and decided by an admin. Approval is
/// a pure status change: it moves no money and accrues no interest.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DepositApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: DepositKind,
    /// Principal amount.
    pub amount: Decimal,
    pub tenure_months: i32,
    /// Instalment for recurring deposits; absent for fixed deposits.
    pub monthly_amount: Option<Decimal>,
    pub interest_rate: Decimal,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl DepositApplication {
    pub fn fixed(
        user_id: Uuid,
        amount: Decimal,
        tenure_months: i32,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind: DepositKind::Fixed,
            amount,
            tenure_months,
            monthly_amount: None,
            interest_rate,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn recurring(
        user_id: Uuid,
        amount: Decimal,
        tenure_months: i32,
        monthly_amount: Decimal,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind: DepositKind::Recurring,
            amount,
            tenure_months,
            monthly_amount: Some(monthly_amount),
            interest_rate,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
