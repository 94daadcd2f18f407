use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Employee, Route, WorkTimeShift};
use crate::database::{Repository, StoreError};
use crate::types::TenantId;

/// One timecard line as rendered into the work-time PDF
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkTimeInfo {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub route_id: Option<Uuid>,
    pub route_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub break_minutes: i32,
    /// Net hours to two decimals; `None` for open shifts
    pub hours: Option<Decimal>,
    pub note: Option<String>,
}

impl WorkTimeInfo {
    fn build(shift: WorkTimeShift, employees: &HashMap<Uuid, Employee>, routes: &HashMap<Uuid, Route>) -> Self {
        let hours = shift
            .worked_minutes()
            .map(|minutes| {
                let mut hours = (Decimal::from(minutes) / Decimal::from(60)).round_dp(2);
                hours.rescale(2);
                hours
            });

        Self {
            id: shift.id,
            employee_id: shift.employee_id,
            employee_name: employees.get(&shift.employee_id).map(Employee::full_name),
            route_id: shift.route_id,
            route_name: shift
                .route_id
                .and_then(|id| routes.get(&id))
                .map(|route| route.name.clone()),
            start_time: shift.start_time,
            end_time: shift.end_time,
            break_minutes: shift.break_minutes,
            hours,
            note: shift.note,
        }
    }
}

#[derive(Clone)]
pub struct TimecardService {
    repository: Repository,
}

impl TimecardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Shifts of one tenant joined with employee and route names, ordered by
    /// start time. All three reads are scoped to the same tenant.
    pub async fn work_time_info(&self, tenant: &TenantId) -> Result<Vec<WorkTimeInfo>, StoreError> {
        let mut shifts: Vec<WorkTimeShift> = self.repository.list(tenant).await?;
        let employees: HashMap<Uuid, Employee> = self
            .repository
            .list::<Employee>(tenant)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();
        let routes: HashMap<Uuid, Route> = self
            .repository
            .list::<Route>(tenant)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        shifts.sort_by_key(|shift| shift.start_time);
        Ok(shifts
            .into_iter()
            .map(|shift| WorkTimeInfo::build(shift, &employees, &routes))
            .collect())
    }
}
