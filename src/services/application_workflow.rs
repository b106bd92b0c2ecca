use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    ActorContext, ApplicationStatus, DepositApplication, DepositKind, Notification,
};
use crate::observability::get_metrics;
use crate::repositories::{ApplicationRepository, NotificationRepository};
use crate::services::validation::ValidationRules;

/// User submission for a fixed deposit.
#[derive(Debug, Clone)]
pub struct SubmitFixedDeposit {
    pub amount: Decimal,
    pub tenure_months: i32,
    pub interest_rate: Decimal,
}

/// User submission for a recurring deposit.
#[derive(Debug, Clone)]
pub struct SubmitRecurringDeposit {
    pub amount: Decimal,
    pub tenure_months: i32,
    pub monthly_amount: Decimal,
    pub interest_rate: Decimal,
}

/// State machine for the application lifecycle.
///
/// Pending is the only state decisions can be made from; Approved and
/// Rejected are terminal.
#[derive(Debug, Clone)]
pub struct ApplicationStateMachine;

impl ApplicationStateMachine {
    /// Returns valid next states from the current state.
    pub fn valid_transitions(current: ApplicationStatus) -> Vec<ApplicationStatus> {
        match current {
            ApplicationStatus::Pending => {
                vec![ApplicationStatus::Approved, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Approved => vec![],
            ApplicationStatus::Rejected => vec![],
        }
    }

    /// Checks if a transition is valid.
    pub fn can_transition(from: ApplicationStatus, to: ApplicationStatus) -> bool {
        Self::valid_transitions(from).contains(&to)
    }

    /// Attempts to transition to a new state.
    pub fn transition(
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<ApplicationStatus> {
        if Self::can_transition(from, to) {
            Ok(to)
        } else {
            Err(AppError::Conflict(format!(
                "Invalid application transition from {:?} to {:?}",
                from, to
            )))
        }
    }
}

/// FD/RD application lifecycle: submit, decide, delete, list.
///
/// Decisions are admin-only and notify the applicant. Approval is a pure
/// status change; it never touches balances or the transaction ledger.
pub struct ApplicationWorkflow {
    applications: ApplicationRepository,
    notifications: NotificationRepository,
}

impl ApplicationWorkflow {
    pub fn new(pool: PgPool) -> Self {
        Self {
            applications: ApplicationRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool),
        }
    }

    /// Submits a fixed-deposit application for the acting user.
    pub async fn submit_fixed(
        &self,
        actor: ActorContext,
        request: SubmitFixedDeposit,
    ) -> Result<DepositApplication> {
        ValidationRules::validate_positive_amount("amount", request.amount)?;
        ValidationRules::validate_positive_months("tenure", request.tenure_months)?;
        ValidationRules::validate_positive_amount("interest rate", request.interest_rate)?;

        let application = DepositApplication::fixed(
            actor.user_id,
            request.amount,
            request.tenure_months,
            request.interest_rate,
        );
        let created = self.applications.create(&application).await?;

        get_metrics().record_application_submitted(created.kind.label());
        info!(application_id = %created.id, kind = created.kind.label(), "application submitted");

        Ok(created)
    }

    /// Submits a recurring-deposit application for the acting user.
    pub async fn submit_recurring(
        &self,
        actor: ActorContext,
        request: SubmitRecurringDeposit,
    ) -> Result<DepositApplication> {
        ValidationRules::validate_positive_amount("amount", request.amount)?;
        ValidationRules::validate_positive_months("tenure", request.tenure_months)?;
        ValidationRules::validate_positive_amount("monthly amount", request.monthly_amount)?;
        ValidationRules::validate_positive_amount("interest rate", request.interest_rate)?;

        let application = DepositApplication::recurring(
            actor.user_id,
            request.amount,
            request.tenure_months,
            request.monthly_amount,
            request.interest_rate,
        );
        let created = self.applications.create(&application).await?;

        get_metrics().record_application_submitted(created.kind.label());
        info!(application_id = %created.id, kind = created.kind.label(), "application submitted");

        Ok(created)
    }

    /// Approves a Pending application. Admin only.
    pub async fn approve(&self, actor: ActorContext, id: Uuid) -> Result<DepositApplication> {
        self.decide(actor, id, ApplicationStatus::Approved).await
    }

    /// Rejects a Pending application. Admin only.
    pub async fn reject(&self, actor: ActorContext, id: Uuid) -> Result<DepositApplication> {
        self.decide(actor, id, ApplicationStatus::Rejected).await
    }

    async fn decide(
        &self,
        actor: ActorContext,
        id: Uuid,
        decision: ApplicationStatus,
    ) -> Result<DepositApplication> {
        actor.require_admin()?;

        let application = self
            .applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application '{}' not found", id)))?;

        ApplicationStateMachine::transition(application.status, decision)?;

        let updated = self
            .applications
            .update_status(id, decision)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application '{}' not found", id)))?;

        self.notify_decision(&updated).await?;

        get_metrics().record_application_decided(updated.kind.label(), updated.status.label());
        info!(
            application_id = %updated.id,
            kind = updated.kind.label(),
            decision = updated.status.label(),
            "application decided"
        );

        Ok(updated)
    }

    /// Decides every Pending application of one kind at once. Admin only.
    /// Returns the number of applications updated.
    pub async fn decide_all_pending(
        &self,
        actor: ActorContext,
        kind: DepositKind,
        decision: ApplicationStatus,
    ) -> Result<usize> {
        actor.require_admin()?;

        if !decision.is_terminal() {
            return Err(AppError::Validation(
                "Bulk decision must be Approved or Rejected".to_string(),
            ));
        }

        let updated = self.applications.update_all_pending(kind, decision).await?;
        for application in &updated {
            self.notify_decision(application).await?;
            get_metrics()
                .record_application_decided(application.kind.label(), application.status.label());
        }

        info!(
            kind = kind.label(),
            decision = decision.label(),
            count = updated.len(),
            "bulk application decision"
        );

        Ok(updated.len())
    }

    /// Hard-deletes an application, whatever its status. Admin only.
    pub async fn delete(&self, actor: ActorContext, id: Uuid) -> Result<()> {
        actor.require_admin()?;

        if !self.applications.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Application '{}' not found",
                id
            )));
        }

        info!(application_id = %id, "application deleted");
        Ok(())
    }

    /// The acting user's own applications, newest first.
    pub async fn list_for_user(
        &self,
        actor: ActorContext,
        kind: Option<DepositKind>,
    ) -> Result<Vec<DepositApplication>> {
        self.applications.list_for_user(actor.user_id, kind).await
    }

    /// The acting user's notifications, newest first.
    pub async fn notifications_for_user(&self, actor: ActorContext) -> Result<Vec<Notification>> {
        self.notifications.list_for_user(actor.user_id).await
    }

    async fn notify_decision(&self, application: &DepositApplication) -> Result<()> {
        let kind = match application.kind {
            DepositKind::Fixed => "fixed deposit",
            DepositKind::Recurring => "recurring deposit",
        };
        let message = format!(
            "Your {} application of {} has been {}",
            kind,
            application.amount,
            application.status.label()
        );
        self.notifications
            .create(&Notification::new(application.user_id, message))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions_from_pending() {
        let next = ApplicationStateMachine::valid_transitions(ApplicationStatus::Pending);
        assert!(next.contains(&ApplicationStatus::Approved));
        assert!(next.contains(&ApplicationStatus::Rejected));
    }

    #[test]
    fn test_terminal_states_have_no_transitions() {
        assert!(ApplicationStateMachine::valid_transitions(ApplicationStatus::Approved).is_empty());
        assert!(ApplicationStateMachine::valid_transitions(ApplicationStatus::Rejected).is_empty());
    }

    #[test]
    fn test_cannot_reapprove_rejected() {
        assert!(!ApplicationStateMachine::can_transition(
            ApplicationStatus::Rejected,
            ApplicationStatus::Approved
        ));
        assert!(matches!(
            ApplicationStateMachine::transition(
                ApplicationStatus::Rejected,
                ApplicationStatus::Approved
            ),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        assert!(!ApplicationStateMachine::can_transition(
            ApplicationStatus::Pending,
            ApplicationStatus::Pending
        ));
    }
}
