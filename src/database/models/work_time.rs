use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Table, TenantScoped};
use crate::types::TenantId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTimeShift {
    pub id: Uuid,
    pub organization_id: String,
    pub employee_id: Uuid,
    #[serde(default)]
    pub route_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub break_minutes: i32,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorkTimeShift {
    /// Minutes worked net of breaks; `None` while the shift is still open.
    pub fn worked_minutes(&self) -> Option<i64> {
        let end = self.end_time?;
        let gross = (end - self.start_time).num_minutes();
        Some((gross - i64::from(self.break_minutes)).max(0))
    }
}

impl TenantScoped for WorkTimeShift {
    const TABLE: Table = Table::WorkTimes;

    fn organization_id(&self) -> &str {
        &self.organization_id
    }
}

/// Request body for recording a shift. Carries no organization: the tenant
/// always comes from the authenticated principal.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkTimeShift {
    pub employee_id: Uuid,
    #[serde(default)]
    pub route_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub break_minutes: i32,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewWorkTimeShift {
    pub fn validate(&self) -> Result<(), String> {
        if self.break_minutes < 0 {
            return Err("break_minutes must not be negative".to_string());
        }
        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err("end_time must not be before start_time".to_string());
            }
        }
        Ok(())
    }

    pub fn into_shift(self, tenant: &TenantId) -> WorkTimeShift {
        WorkTimeShift {
            id: Uuid::new_v4(),
            organization_id: tenant.as_str().to_string(),
            employee_id: self.employee_id,
            route_id: self.route_id,
            start_time: self.start_time,
            end_time: self.end_time,
            break_minutes: self.break_minutes,
            note: self.note,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(end_hour: Option<u32>, break_minutes: i32) -> NewWorkTimeShift {
        NewWorkTimeShift {
            employee_id: Uuid::new_v4(),
            route_id: None,
            start_time: Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
            end_time: end_hour.map(|h| Utc.with_ymd_and_hms(2024, 3, 4, h, 0, 0).unwrap()),
            break_minutes,
            note: None,
        }
    }

    #[test]
    fn worked_minutes_subtracts_breaks() {
        let tenant = TenantId::parse("org123").unwrap();
        let shift = draft(Some(16), 30).into_shift(&tenant);
        assert_eq!(shift.worked_minutes(), Some(450));
        assert_eq!(shift.organization_id, "org123");
    }

    #[test]
    fn open_shift_has_no_worked_minutes() {
        let tenant = TenantId::parse("org123").unwrap();
        assert_eq!(draft(None, 0).into_shift(&tenant).worked_minutes(), None);
    }

    #[test]
    fn rejects_inverted_and_negative_shifts() {
        assert!(draft(Some(6), 0).validate().is_err());
        assert!(draft(Some(16), -5).validate().is_err());
        assert!(draft(Some(16), 15).validate().is_ok());
    }

    #[test]
    fn deserializes_postgres_json_rows() {
        let row = serde_json::json!({
            "id": "6a2f41a0-6c1b-4c57-9d5e-2a8e4f4f0a11",
            "organization_id": "org123",
            "employee_id": "0b7d0f8e-51e4-4bcb-8f52-4d1c3c8b2f22",
            "route_id": null,
            "start_time": "2024-03-04T08:00:00+00:00",
            "end_time": null,
            "break_minutes": 0,
            "note": null,
            "created_at": "2024-03-04T07:59:12.123456+00:00"
        });
        let shift: WorkTimeShift = serde_json::from_value(row).unwrap();
        assert_eq!(shift.organization_id(), "org123");
        assert!(shift.end_time.is_none());
    }
}
