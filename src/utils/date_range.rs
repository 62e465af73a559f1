use chrono::{Datelike, NaiveDate};
use derive_more::Display;

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[display(fmt = "start_date {} cannot be after end_date {}", start, end)]
pub struct InvalidRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl std::error::Error for InvalidRange {}

pub fn check_order(start: NaiveDate, end: NaiveDate) -> Result<(), InvalidRange> {
    if start > end {
        return Err(InvalidRange { start, end });
    }
    Ok(())
}

/// Every date from `start` to `end`, both inclusive, ascending.
pub fn expand(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, InvalidRange> {
    check_order(start, end)?;

    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// First and last date of a Gregorian month. `None` for month outside 1..=12
/// or a year chrono cannot represent.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((first, next.pred_opt()?))
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    month_bounds(year, month).map(|(_, last)| last.day())
}
