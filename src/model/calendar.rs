use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_record::{LeaveDuration, LeaveRecord};

/// One employee's leave as shown in a calendar cell's hover detail.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayEntry {
    #[schema(example = "LA0001")]
    pub application_id: String,
    #[schema(example = "Alice Moreau")]
    pub employee_name: String,
    #[schema(example = "Sick Leave")]
    pub leave_type: String,
    pub duration: LeaveDuration,
}

impl From<&LeaveRecord> for DayEntry {
    fn from(record: &LeaveRecord) -> Self {
        Self {
            application_id: record.application_id(),
            employee_name: record.employee_name.clone(),
            leave_type: record.leave_type.clone(),
            duration: record.duration,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "year": 2025,
    "month": 7,
    "month_name": "July",
    "employee": "All",
    "days_in_month": 31,
    "first_weekday": 1,
    "weeks": [[null, 1, 2, 3, 4, 5, 6]],
    "days": {
        "1": [
            {"application_id": "LA0001", "employee_name": "Alice Moreau", "leave_type": "Sick Leave", "duration": "full_day"}
        ]
    }
}))]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    /// employee selection the grid was built for
    pub employee: String,
    pub days_in_month: u32,
    /// weekday of day 1, Monday = 0
    pub first_weekday: u32,
    /// Monday-first rows of seven cells; `None` pads before day 1 and after the last day
    pub weeks: Vec<Vec<Option<u32>>>,
    /// days without any leave are absent
    pub days: BTreeMap<u32, Vec<DayEntry>>,
}

impl CalendarMonth {
    pub fn registrations(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}
