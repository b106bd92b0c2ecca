use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error taxonomy.
///
/// Every failure is per-request; nothing here is fatal to the process.
/// `Validation` and `NotFound` are surfaced to the caller as-is. `Conflict`
/// signals a state conflict (invalid status transition, or a balance that
/// changed under a concurrent writer) and callers should retry the whole
/// operation from a fresh read rather than reapply a cached delta.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected by a validation rule. The message names the offending
    /// field and the exact bound that was violated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced account or application does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The entity is not in a state that permits the requested operation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The acting user lacks the required capability.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Returns true if the caller can fix the request and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Conflict(_) | AppError::NotFound(_)
        )
    }

    /// Short machine-readable label, used as a metrics failure reason.
    pub fn reason(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Forbidden(_) => "forbidden",
            AppError::Database(_) => "database",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(AppError::Validation("too small".into()).is_recoverable());
        assert!(AppError::NotFound("account".into()).is_recoverable());
        assert!(AppError::Conflict("already approved".into()).is_recoverable());
        assert!(!AppError::Forbidden("admin only".into()).is_recoverable());
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(AppError::Validation("x".into()).reason(), "validation");
        assert_eq!(AppError::NotFound("x".into()).reason(), "not_found");
        assert_eq!(AppError::Conflict("x".into()).reason(), "conflict");
    }
}
