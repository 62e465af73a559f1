pub mod calendar;
pub mod employee_stats;
pub mod leave_record;
