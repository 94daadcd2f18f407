pub mod account_directory;
pub mod subscription_service;
pub mod timecard_service;

pub use account_directory::{AccountDirectory, HttpAccountDirectory, MemoryAccountDirectory};
pub use subscription_service::{IdentityError, SubscriptionService};
pub use timecard_service::{TimecardService, WorkTimeInfo};
