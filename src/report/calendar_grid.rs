use std::collections::BTreeMap;

use chrono::{Datelike, Month};
use derive_more::Display;

use crate::{
    model::{
        calendar::{CalendarMonth, DayEntry},
        leave_record::LeaveRecord,
    },
    utils::{date_range, leave_filter::EmployeeFilter},
};

#[derive(Debug, Display, PartialEq, Eq)]
pub enum GridError {
    #[display(fmt = "month must be between 1 and 12, got {}", _0)]
    InvalidMonth(u32),
    #[display(fmt = "year {} is out of range", _0)]
    InvalidYear(i32),
}

impl std::error::Error for GridError {}

/// Map every leave active in `year`-`month` onto its days of the month.
///
/// Entries keep record iteration order within a day; several employees on
/// the same day are all kept.
pub fn build_month(
    year: i32,
    month: u32,
    records: &[LeaveRecord],
    filter: &EmployeeFilter,
) -> Result<CalendarMonth, GridError> {
    if !(1..=12).contains(&month) {
        return Err(GridError::InvalidMonth(month));
    }
    if year < 1 {
        return Err(GridError::InvalidYear(year));
    }
    let (first, last) = date_range::month_bounds(year, month).ok_or(GridError::InvalidYear(year))?;
    let days_in_month = date_range::days_in_month(year, month).ok_or(GridError::InvalidYear(year))?;

    let mut days: BTreeMap<u32, Vec<DayEntry>> = BTreeMap::new();
    for record in filter.apply(records) {
        if !record.overlaps(first, last) {
            continue;
        }

        let from = record.start_date.max(first);
        let to = record.end_date.min(last);
        // clipped bounds keep start <= end since the record overlaps the month
        let Ok(dates) = date_range::expand(from, to) else {
            continue;
        };

        let entry = DayEntry::from(record);
        for date in dates {
            days.entry(date.day()).or_default().push(entry.clone());
        }
    }

    let first_weekday = first.weekday().num_days_from_monday();
    let month_name = Month::try_from(month as u8)
        .map(|m| m.name().to_string())
        .map_err(|_| GridError::InvalidMonth(month))?;

    Ok(CalendarMonth {
        year,
        month,
        month_name,
        employee: filter.label().to_string(),
        days_in_month,
        first_weekday,
        weeks: week_rows(first_weekday, days_in_month),
        days,
    })
}

fn week_rows(first_weekday: u32, days_in_month: u32) -> Vec<Vec<Option<u32>>> {
    let mut cells: Vec<Option<u32>> = vec![None; first_weekday as usize];
    cells.extend((1..=days_in_month).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    cells.chunks(7).map(<[Option<u32>]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_record::{LeaveDraft, LeaveDuration};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: u64, name: &str, kind: &str, start: NaiveDate, end: NaiveDate, duration: LeaveDuration) -> LeaveRecord {
        let mut draft = LeaveDraft::single_day(name, kind, start, duration);
        draft.end_date = end;
        draft.into_record(id).unwrap()
    }

    #[test]
    fn same_day_leaves_keep_insertion_order() {
        let records = vec![
            record(1, "Alice", "Sick Leave", date(2025, 7, 1), date(2025, 7, 1), LeaveDuration::FullDay),
            record(2, "Bob", "Casual Leave", date(2025, 7, 1), date(2025, 7, 1), LeaveDuration::HalfDay),
        ];

        let grid = build_month(2025, 7, &records, &EmployeeFilter::All).unwrap();

        let day_one = &grid.days[&1];
        assert_eq!(day_one.len(), 2);
        assert_eq!(day_one[0].employee_name, "Alice");
        assert_eq!(day_one[0].leave_type, "Sick Leave");
        assert_eq!(day_one[0].duration, LeaveDuration::FullDay);
        assert_eq!(day_one[1].employee_name, "Bob");
        assert_eq!(day_one[1].duration, LeaveDuration::HalfDay);
        assert!(!grid.days.contains_key(&2));
    }

    #[test]
    fn day_one_sits_under_its_weekday() {
        // 2025-07-01 is a Tuesday
        let grid = build_month(2025, 7, &[], &EmployeeFilter::All).unwrap();

        assert_eq!(grid.month_name, "July");
        assert_eq!(grid.days_in_month, 31);
        assert_eq!(grid.first_weekday, 1);
        assert_eq!(grid.weeks[0], vec![None, Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]);
        assert!(grid.weeks.iter().all(|w| w.len() == 7));
        let last = grid.weeks.last().unwrap();
        assert_eq!(last, &vec![Some(28), Some(29), Some(30), Some(31), None, None, None]);
        assert!(grid.days.is_empty());
    }

    #[test]
    fn month_starting_on_monday_has_no_padding() {
        // 2025-09-01 is a Monday
        let grid = build_month(2025, 9, &[], &EmployeeFilter::All).unwrap();
        assert_eq!(grid.first_weekday, 0);
        assert_eq!(grid.weeks[0][0], Some(1));
    }

    #[test]
    fn multi_day_leave_is_clipped_to_the_month() {
        let records = vec![record(
            1,
            "Carol",
            "Earned Leave",
            date(2025, 6, 28),
            date(2025, 7, 3),
            LeaveDuration::FullDay,
        )];

        let july = build_month(2025, 7, &records, &EmployeeFilter::All).unwrap();
        let days: Vec<u32> = july.days.keys().copied().collect();
        assert_eq!(days, vec![1, 2, 3]);

        let june = build_month(2025, 6, &records, &EmployeeFilter::All).unwrap();
        let days: Vec<u32> = june.days.keys().copied().collect();
        assert_eq!(days, vec![28, 29, 30]);
    }

    #[test]
    fn registrations_match_record_date_intersections() {
        let records = vec![
            record(1, "Alice", "Sick Leave", date(2024, 2, 26), date(2024, 3, 4), LeaveDuration::FullDay),
            record(2, "Bob", "Earned Leave", date(2024, 2, 29), date(2024, 2, 29), LeaveDuration::HalfDay),
            record(3, "Alice", "Personal Leave", date(2024, 1, 31), date(2024, 2, 2), LeaveDuration::FullDay),
            record(4, "Dan", "Sick Leave", date(2024, 3, 10), date(2024, 3, 12), LeaveDuration::FullDay),
        ];

        let grid = build_month(2024, 2, &records, &EmployeeFilter::All).unwrap();

        // Alice 26..=29 (4) + Bob 29 (1) + Alice 1..=2 (2)
        assert_eq!(grid.registrations(), 7);
        assert_eq!(grid.days.len(), 6);
        assert_eq!(grid.days[&29].len(), 2);
        assert_eq!(grid.days_in_month, 29);
    }

    #[test]
    fn named_filter_drops_other_employees() {
        let records = vec![
            record(1, "Alice", "Sick Leave", date(2025, 7, 1), date(2025, 7, 2), LeaveDuration::FullDay),
            record(2, "Bob", "Casual Leave", date(2025, 7, 1), date(2025, 7, 1), LeaveDuration::HalfDay),
        ];

        let grid = build_month(2025, 7, &records, &EmployeeFilter::Named("Bob".into())).unwrap();

        assert_eq!(grid.employee, "Bob");
        assert_eq!(grid.registrations(), 1);
        assert_eq!(grid.days[&1][0].employee_name, "Bob");
        assert!(!grid.days.contains_key(&2));
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert_eq!(
            build_month(2025, 13, &[], &EmployeeFilter::All).unwrap_err(),
            GridError::InvalidMonth(13)
        );
        assert_eq!(
            build_month(2025, 0, &[], &EmployeeFilter::All).unwrap_err(),
            GridError::InvalidMonth(0)
        );
        assert_eq!(
            build_month(0, 1, &[], &EmployeeFilter::All).unwrap_err(),
            GridError::InvalidYear(0)
        );
    }
}
