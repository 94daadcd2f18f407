use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Table, TenantScoped};

/// A delivery or service route employees are scheduled on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub organization_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TenantScoped for Route {
    const TABLE: Table = Table::Routes;

    fn organization_id(&self) -> &str {
        &self.organization_id
    }
}
