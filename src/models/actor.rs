use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Authenticated caller context supplied by the identity provider.
///
/// Admin-only transitions call `require_admin` at the top of the handler
/// instead of relying on ambient session state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl ActorContext {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "This operation requires administrator privileges".to_string(),
            ))
        }
    }
}
