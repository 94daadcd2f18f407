pub mod employee;
pub mod route;
pub mod work_time;

use serde::{de::DeserializeOwned, Serialize};

pub use employee::Employee;
pub use route::Route;
pub use work_time::{NewWorkTimeShift, WorkTimeShift};

/// Tables holding tenant-owned rows. Names are static so they can be
/// interpolated into SQL without quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Employees,
    Routes,
    WorkTimes,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Employees => "employees",
            Table::Routes => "routes",
            Table::WorkTimes => "work_times",
        }
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            Table::Employees => "last_name, first_name",
            Table::Routes => "name",
            Table::WorkTimes => "start_time",
        }
    }
}

/// A persisted business entity owned by exactly one organization
pub trait TenantScoped: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABLE: Table;

    fn organization_id(&self) -> &str;
}
