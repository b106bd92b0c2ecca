use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ApplicationStatus, DepositApplication, DepositKind};

const APPLICATION_COLUMNS: &str = "id, user_id, kind, amount, tenure_months, monthly_amount, \
     interest_rate, status, created_at";

/// Repository for FD/RD deposit applications.
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a newly submitted application.
    pub async fn create(&self, application: &DepositApplication) -> Result<DepositApplication> {
        let sql = format!(
            "INSERT INTO deposit_applications (id, user_id, kind, amount, tenure_months, \
             monthly_amount, interest_rate, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {APPLICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DepositApplication>(&sql)
            .bind(application.id)
            .bind(application.user_id)
            .bind(application.kind)
            .bind(application.amount)
            .bind(application.tenure_months)
            .bind(application.monthly_amount)
            .bind(application.interest_rate)
            .bind(application.status)
            .bind(application.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Finds an application by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DepositApplication>> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM deposit_applications WHERE id = $1");
        let row = sqlx::query_as::<_, DepositApplication>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// A user's own applications, newest first, optionally of one kind.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<DepositKind>,
    ) -> Result<Vec<DepositApplication>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM deposit_applications \
             WHERE user_id = $1 AND ($2::deposit_kind IS NULL OR kind = $2) \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, DepositApplication>(&sql)
            .bind(user_id)
            .bind(kind)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Updates the status of one application.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<DepositApplication>> {
        let sql = format!(
            "UPDATE deposit_applications SET status = $2 WHERE id = $1 \
             RETURNING {APPLICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DepositApplication>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Moves every Pending application of one kind to the given status and
    /// returns the updated rows.
    pub async fn update_all_pending(
        &self,
        kind: DepositKind,
        status: ApplicationStatus,
    ) -> Result<Vec<DepositApplication>> {
        let sql = format!(
            "UPDATE deposit_applications SET status = $2 \
             WHERE kind = $1 AND status = 'PENDING' \
             RETURNING {APPLICATION_COLUMNS}"
        );
        let rows = sqlx::query_as::<_, DepositApplication>(&sql)
            .bind(kind)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Hard-deletes an application. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM deposit_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
