pub mod account_repository;
pub mod application_repository;
pub mod notification_repository;
pub mod transaction_repository;

pub use account_repository::AccountRepository;
pub use application_repository::ApplicationRepository;
pub use notification_repository::NotificationRepository;
pub use transaction_repository::TransactionRepository;

use sqlx::PgPool;

/// Database connection pool type alias.
pub type DbPool = PgPool;
