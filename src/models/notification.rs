use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A message to a user. Write-once, read-many.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            message,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let user_id = Uuid::new_v4();
        let notification =
            Notification::new(user_id, "Your application has been approved".to_string());

        assert_eq!(notification.user_id, user_id);
        assert_eq!(notification.message, "Your application has been approved");
    }
}
