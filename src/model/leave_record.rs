use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use utoipa::ToSchema;

use crate::utils::date_range::{self, InvalidRange};

/// Duration unit of a leave entry. Spreadsheets encode it as `1` / `0.5`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDuration {
    #[strum(serialize = "Full Day")]
    FullDay,
    #[strum(serialize = "Half Day")]
    HalfDay,
}

impl LeaveDuration {
    /// Map the numeric spreadsheet value. Anything but 1 or 0.5 is unmapped.
    pub fn from_units(units: f64) -> Option<Self> {
        if (units - 1.0).abs() < f64::EPSILON {
            Some(LeaveDuration::FullDay)
        } else if (units - 0.5).abs() < f64::EPSILON {
            Some(LeaveDuration::HalfDay)
        } else {
            None
        }
    }

    pub fn units(&self) -> f64 {
        match self {
            LeaveDuration::FullDay => 1.0,
            LeaveDuration::HalfDay => 0.5,
        }
    }
}

/// Leave types offered by the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum_macros::Display)]
pub enum StandardLeaveType {
    #[strum(serialize = "Earned Leave")]
    Earned,
    #[strum(serialize = "Sick Leave")]
    Sick,
    #[strum(serialize = "Personal Leave")]
    Personal,
    #[strum(serialize = "Emergency Leave")]
    Emergency,
    #[strum(serialize = "Joining Transfer Leave")]
    JoiningTransfer,
    #[strum(serialize = "Casual Leave")]
    Casual,
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ValidationError {
    #[display(fmt = "{} is required", _0)]
    MissingField(&'static str),
    #[display(fmt = "{}", _0)]
    Range(InvalidRange),
}

impl std::error::Error for ValidationError {}

impl From<InvalidRange> for ValidationError {
    fn from(err: InvalidRange) -> Self {
        ValidationError::Range(err)
    }
}

/// Unvalidated leave entry, as typed into the form or read from a sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveDraft {
    pub employee_name: String,
    pub email: Option<String>,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: LeaveDuration,
    pub reason: Option<String>,
}

impl LeaveDraft {
    pub fn single_day(
        employee_name: impl Into<String>,
        leave_type: impl Into<String>,
        date: NaiveDate,
        duration: LeaveDuration,
    ) -> Self {
        Self {
            employee_name: employee_name.into(),
            email: None,
            leave_type: leave_type.into(),
            start_date: date,
            end_date: date,
            duration,
            reason: None,
        }
    }

    /// Checks required fields and date order without consuming the draft.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.employee_name.trim().is_empty() {
            return Err(ValidationError::MissingField("employee_name"));
        }
        if self.leave_type.trim().is_empty() {
            return Err(ValidationError::MissingField("leave_type"));
        }
        date_range::check_order(self.start_date, self.end_date)?;
        Ok(())
    }

    pub fn into_record(self, id: u64) -> Result<LeaveRecord, ValidationError> {
        self.validate()?;

        Ok(LeaveRecord {
            id,
            employee_name: self.employee_name.trim().to_string(),
            email: self.email.filter(|e| !e.trim().is_empty()),
            leave_type: self.leave_type.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            duration: self.duration,
            reason: self.reason.filter(|r| !r.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 12,
    "employee_name": "Alice Moreau",
    "email": "alice@company.com",
    "leave_type": "Sick Leave",
    "start_date": "2025-07-01",
    "end_date": "2025-07-02",
    "duration": "full_day",
    "reason": null
}))]
pub struct LeaveRecord {
    /// position in the store, starting at 1
    pub id: u64,
    pub employee_name: String,
    pub email: Option<String>,
    pub leave_type: String,
    #[schema(example = "2025-07-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-07-01", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub duration: LeaveDuration,
    pub reason: Option<String>,
}

impl LeaveRecord {
    pub fn application_id(&self) -> String {
        format!("LA{:04}", self.id)
    }

    /// Calendar days covered, both ends inclusive.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Covered days weighted by duration.
    pub fn leave_days(&self) -> f64 {
        self.days() as f64 * self.duration.units()
    }

    pub fn overlaps(&self, first: NaiveDate, last: NaiveDate) -> bool {
        self.start_date <= last && self.end_date >= first
    }
}
