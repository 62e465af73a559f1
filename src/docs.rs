use crate::api::leave_request::{ApplyLeave, LeaveFilter, LeaveListResponse};
use crate::model::calendar::{CalendarMonth, DayEntry};
use crate::model::employee_stats::EmployeeStats;
use crate::model::leave_record::{LeaveDuration, LeaveRecord};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Tracker API",
        version = "0.1.0",
        description = r#"
## Team Leave Tracker

Monthly leave calendar, per-employee statistics and a leave application form
over an in-memory set of leave records.

### 🔹 Key Features
- **Calendar**
  - Month grid (Monday first) with every employee on leave per day
- **Statistics**
  - Yearly totals, full/half day split, breakdown by type and by month
- **Leave Records**
  - Apply for leave, list and filter records by employee
  - Load records from an xlsx workbook, export them back

### 📦 Response Format
- JSON responses; xlsx for export
- Records are kept in memory; an upload replaces them all

---
Built with **Rust**, **Actix Web** and **Utoipa**.
"#,
    ),
    paths(
        crate::api::calendar::month_calendar,

        crate::api::employee::list_employees,
        crate::api::employee::employee_stats,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_types,
        crate::api::leave_request::upload_leaves,
        crate::api::leave_request::export_leaves
    ),
    components(
        schemas(
            ApplyLeave,
            LeaveFilter,
            LeaveListResponse,
            LeaveRecord,
            LeaveDuration,
            CalendarMonth,
            DayEntry,
            EmployeeStats
        )
    ),
    tags(
        (name = "Calendar", description = "Month calendar APIs"),
        (name = "Employee", description = "Employee statistics APIs"),
        (name = "Leave", description = "Leave record APIs"),
    )
)]
pub struct ApiDoc;
