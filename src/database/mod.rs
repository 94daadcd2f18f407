pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{Fixtures, MemoryStore};
pub use postgres::PgStore;
pub use repository::Repository;
pub use store::{StoreError, TenantStore};
