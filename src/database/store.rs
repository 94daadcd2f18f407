use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::database::models::Table;
use crate::types::TenantId;

/// Errors surfaced by a `TenantStore`
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt row in {table}: {message}")]
    Corrupt { table: &'static str, message: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Row storage for tenant-owned tables. Rows travel as JSON objects and are
/// typed by the repository.
///
/// Implementations must apply the tenant filter themselves; the repository
/// re-checks ownership on the way out.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Rows of `table` whose `organization_id` equals `tenant`. An empty
    /// result is not an error.
    async fn select_by_tenant(&self, table: Table, tenant: &TenantId) -> Result<Vec<Value>, StoreError>;

    /// Persist a complete row and return it as stored
    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
