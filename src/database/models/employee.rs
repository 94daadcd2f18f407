use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Table, TenantScoped};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub organization_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl TenantScoped for Employee {
    const TABLE: Table = Table::Employees;

    fn organization_id(&self) -> &str {
        &self.organization_id
    }
}
