use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Row};

use crate::database::models::Table;
use crate::database::store::{StoreError, TenantStore};
use crate::types::TenantId;

/// `TenantStore` over the Postgres schema in `sql/schema.sql`
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_sql(table: Table) -> String {
        format!(
            "SELECT row_to_json(t) AS row FROM {} t WHERE t.organization_id = $1 ORDER BY {}",
            table.name(),
            table.order_by()
        )
    }

    fn insert_sql(table: Table) -> String {
        let name = table.name();
        format!(
            "INSERT INTO {name} SELECT * FROM jsonb_populate_record(NULL::{name}, $1) RETURNING row_to_json({name}.*) AS row"
        )
    }
}

#[async_trait]
impl TenantStore for PgStore {
    async fn select_by_tenant(&self, table: Table, tenant: &TenantId) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query(&Self::select_sql(table))
            .bind(tenant.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<Value, _>("row").map_err(StoreError::from))
            .collect()
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        let stored = sqlx::query(&Self::insert_sql(table))
            .bind(Json(row))
            .fetch_one(&self.pool)
            .await?;

        Ok(stored.try_get::<Value, _>("row")?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
