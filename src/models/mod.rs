pub mod account;
pub mod actor;
pub mod application;
pub mod date_range;
pub mod notification;
pub mod transaction;

pub use account::{Account, AccountProduct, InsufficientFundsError};
pub use actor::ActorContext;
pub use application::{ApplicationStatus, DepositApplication, DepositKind};
pub use date_range::DateRange;
pub use notification::Notification;
pub use transaction::{PaymentMethod, TransactionKind, TransactionRecord};
