pub mod date_range;
pub mod leave_filter;
pub mod source_cache;
pub mod spreadsheet;
