use serde_json::Value;
use std::sync::Arc;

use crate::database::models::TenantScoped;
use crate::database::store::{StoreError, TenantStore};
use crate::types::TenantId;

/// Tenant-scoped access to business entities.
///
/// Every read is filtered by the requested tenant, and every write is stamped
/// with it. Rows a backend returns for another tenant are dropped before they
/// reach a handler.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn TenantStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn TenantStore>) -> Self {
        Self { store }
    }

    pub async fn list<E: TenantScoped>(&self, tenant: &TenantId) -> Result<Vec<E>, StoreError> {
        let rows = self.store.select_by_tenant(E::TABLE, tenant).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let record: E = Self::decode(row)?;
            if record.organization_id() != tenant.as_str() {
                tracing::error!(
                    "Dropped {} row owned by '{}' from listing for tenant '{}'",
                    E::TABLE.name(),
                    record.organization_id(),
                    tenant
                );
                continue;
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Persist `record` under `tenant`, overriding whatever organization it carried
    pub async fn insert<E: TenantScoped>(&self, tenant: &TenantId, record: E) -> Result<E, StoreError> {
        let mut row = serde_json::to_value(&record).map_err(|e| Self::corrupt::<E>(e.to_string()))?;
        match row.as_object_mut() {
            Some(fields) => {
                fields.insert("organization_id".to_string(), Value::String(tenant.as_str().to_string()));
            }
            None => return Err(Self::corrupt::<E>("entity did not serialize to an object".to_string())),
        }

        let stored = self.store.insert(E::TABLE, row).await?;
        let stored: E = Self::decode(stored)?;
        tracing::debug!("Inserted {} row for tenant '{}'", E::TABLE.name(), tenant);
        Ok(stored)
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    fn decode<E: TenantScoped>(row: Value) -> Result<E, StoreError> {
        serde_json::from_value(row).map_err(|e| Self::corrupt::<E>(e.to_string()))
    }

    fn corrupt<E: TenantScoped>(message: String) -> StoreError {
        StoreError::Corrupt {
            table: E::TABLE.name(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::{Route, Table};
    use serde_json::json;
    use uuid::Uuid;

    fn route(org: &str, name: &str) -> Route {
        Route {
            id: Uuid::new_v4(),
            organization_id: org.to_string(),
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn list_never_crosses_tenants() {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::new(store.clone());
        let t1 = TenantId::parse("org123").unwrap();
        let t2 = TenantId::parse("org456").unwrap();

        repo.insert(&t1, route("org123", "North")).await.unwrap();
        repo.insert(&t2, route("org456", "South")).await.unwrap();
        repo.insert(&t2, route("org456", "East")).await.unwrap();

        for (tenant, expected) in [(&t1, 1), (&t2, 2)] {
            let routes: Vec<Route> = repo.list(tenant).await.unwrap();
            assert_eq!(routes.len(), expected);
            assert!(routes.iter().all(|r| r.organization_id == tenant.as_str()));
        }
    }

    #[tokio::test]
    async fn insert_stamps_resolved_tenant() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let tenant = TenantId::parse("org123").unwrap();

        let stored = repo.insert(&tenant, route("org456", "Spoofed")).await.unwrap();
        assert_eq!(stored.organization_id, "org123");

        let other = TenantId::parse("org456").unwrap();
        assert!(repo.list::<Route>(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_tenant_lists_empty() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        let tenant = TenantId::parse("nobody").unwrap();
        assert!(repo.list::<Route>(&tenant).await.unwrap().is_empty());
    }

    /// A store that ignores the tenant filter entirely
    struct LeakyStore(MemoryStore);

    #[async_trait::async_trait]
    impl TenantStore for LeakyStore {
        async fn select_by_tenant(&self, table: Table, _tenant: &TenantId) -> Result<Vec<Value>, StoreError> {
            let a = self.0.select_by_tenant(table, &TenantId::parse("org123").unwrap()).await?;
            let b = self.0.select_by_tenant(table, &TenantId::parse("org456").unwrap()).await?;
            Ok(a.into_iter().chain(b).collect())
        }

        async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
            self.0.insert(table, row).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn drops_foreign_rows_from_leaky_backend() {
        let repo = Repository::new(Arc::new(LeakyStore(MemoryStore::new())));
        let t1 = TenantId::parse("org123").unwrap();
        let t2 = TenantId::parse("org456").unwrap();
        repo.insert(&t1, route("org123", "Mine")).await.unwrap();
        repo.insert(&t2, route("org456", "Theirs")).await.unwrap();

        let routes: Vec<Route> = repo.list(&t1).await.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name, "Mine");
    }

    #[tokio::test]
    async fn malformed_rows_surface_as_corrupt() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_raw(Table::Routes, vec![json!({"organization_id": "org123", "name": 7})])
            .await;
        let repo = Repository::new(store);

        let err = repo.list::<Route>(&TenantId::parse("org123").unwrap()).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { table: "routes", .. }));
    }
}
