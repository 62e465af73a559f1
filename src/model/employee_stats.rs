use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_record::LeaveRecord;

/// Reported as `most_common_type` when the employee took no leave that year.
pub const NO_LEAVES: &str = "No leaves";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "employee": "Alice Moreau",
    "year": 2025,
    "total_leaves": 3,
    "full_days": 2,
    "half_days": 1,
    "leave_days": 2.5,
    "leave_type_counts": {"Sick Leave": 2, "Earned Leave": 1},
    "distinct_types": 2,
    "most_common_type": "Sick Leave",
    "monthly_counts": [0, 1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0],
    "history": []
}))]
pub struct EmployeeStats {
    pub employee: String,
    pub year: i32,
    pub total_leaves: u32,
    pub full_days: u32,
    pub half_days: u32,
    /// covered days weighted by duration
    pub leave_days: f64,
    pub leave_type_counts: BTreeMap<String, u32>,
    pub distinct_types: u32,
    pub most_common_type: String,
    /// index 0 is January
    pub monthly_counts: Vec<u32>,
    /// newest start date first
    pub history: Vec<LeaveRecord>,
}

impl EmployeeStats {
    pub fn empty(employee: &str, year: i32) -> Self {
        Self {
            employee: employee.to_string(),
            year,
            total_leaves: 0,
            full_days: 0,
            half_days: 0,
            leave_days: 0.0,
            leave_type_counts: BTreeMap::new(),
            distinct_types: 0,
            most_common_type: NO_LEAVES.to_string(),
            monthly_counts: vec![0; 12],
            history: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_leaves == 0
    }
}
