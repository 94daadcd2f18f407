use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

use crate::database::models::{Employee, Route, Table, WorkTimeShift};
use crate::database::store::{StoreError, TenantStore};
use crate::types::TenantId;

/// Seed data for the memory store, loaded from YAML
#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub work_times: Vec<WorkTimeShift>,
}

impl Fixtures {
    pub fn from_yaml(source: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&source)
    }
}

/// In-process `TenantStore` for development and tests.
///
/// `fail_with` makes every call return `StoreError::Unavailable` until
/// `recover` is called.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, Vec<Value>>>,
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixtures(fixtures: Fixtures) -> anyhow::Result<Self> {
        let mut tables: HashMap<Table, Vec<Value>> = HashMap::new();
        for employee in fixtures.employees {
            tables.entry(Table::Employees).or_default().push(serde_json::to_value(employee)?);
        }
        for route in fixtures.routes {
            tables.entry(Table::Routes).or_default().push(serde_json::to_value(route)?);
        }
        for shift in fixtures.work_times {
            tables.entry(Table::WorkTimes).or_default().push(serde_json::to_value(shift)?);
        }

        Ok(Self {
            tables: RwLock::new(tables),
            failure: RwLock::new(None),
        })
    }

    /// Insert raw rows without validation, e.g. to simulate a misbehaving backend
    pub async fn seed_raw(&self, table: Table, rows: Vec<Value>) {
        self.tables.write().await.entry(table).or_default().extend(rows);
    }

    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    async fn check_available(&self) -> Result<(), StoreError> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn select_by_tenant(&self, table: Table, tenant: &TenantId) -> Result<Vec<Value>, StoreError> {
        self.check_available().await?;

        let tables = self.tables.read().await;
        let rows = tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.get("organization_id").and_then(Value::as_str) == Some(tenant.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        self.check_available().await?;

        if !row.is_object() {
            return Err(StoreError::Corrupt {
                table: table.name(),
                message: "row must be a JSON object".to_string(),
            });
        }
        self.tables.write().await.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available().await
    }
}
