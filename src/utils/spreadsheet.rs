use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use derive_more::Display;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::model::leave_record::{LeaveDraft, LeaveDuration, LeaveRecord};
use crate::utils::date_range::{self, InvalidRange};

/// Columns read after the leading metadata columns, in order.
pub const LEAVE_COLUMNS: [&str; 5] = ["Email", "Name", "Leave Date", "Leave Type", "Duration"];
/// Optional trailing column for multi-day entries.
pub const END_DATE_COLUMN: &str = "End Date";
/// Leading columns written on export, skipped again on load.
pub const EXPORT_METADATA: [&str; 3] = ["Application ID", "Days", "Reason"];

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Slash dates are month-first; day-first only when that cannot parse.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetLayout {
    /// metadata columns before `Email`
    pub skip_columns: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            skip_columns: EXPORT_METADATA.len(),
        }
    }
}

#[derive(Debug, Clone, Display, PartialEq)]
pub enum RowProblem {
    #[display(fmt = "missing {}", _0)]
    MissingValue(&'static str),
    #[display(fmt = "unreadable {} {:?}", _0, _1)]
    BadDate(&'static str, String),
    #[display(fmt = "duration {:?} is neither 1 nor 0.5", _0)]
    UnmappedDuration(String),
    #[display(fmt = "{}", _0)]
    Range(InvalidRange),
}

#[derive(Debug, Clone, Display, PartialEq)]
#[display(fmt = "row {}: {}", row, problem)]
pub struct RowError {
    /// 1-based sheet row, header included
    pub row: usize,
    pub problem: RowProblem,
}

#[derive(Debug, Display)]
pub enum LoadError {
    #[display(fmt = "unreadable workbook: {}", _0)]
    Workbook(String),
    #[display(fmt = "workbook has no worksheet")]
    NoWorksheet,
    #[display(fmt = "{}", "rows_summary(_0)")]
    Rows(Vec<RowError>),
}

fn rows_summary(rows: &[RowError]) -> String {
    match rows.first() {
        Some(first) => format!("{} invalid row(s), first at {}", rows.len(), first),
        None => "0 invalid row(s)".to_string(),
    }
}

impl std::error::Error for LoadError {}

/// Parse the first worksheet of an xlsx workbook.
///
/// The first row is a header. Blank rows are skipped. Any bad row rejects the
/// whole workbook; every bad row is reported.
pub fn read_workbook(bytes: &[u8], layout: SheetLayout) -> Result<Vec<LeaveDraft>, LoadError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| LoadError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)?
        .map_err(|e| LoadError::Workbook(e.to_string()))?;

    // The range begins at the first used cell, not at A1.
    let (start_row, start_col) = range.start().map_or((0, 0), |(r, c)| (r as usize, c as usize));
    let skip = layout.skip_columns.saturating_sub(start_col);
    let blank_lead = start_col.saturating_sub(layout.skip_columns);

    let mut drafts = Vec::new();
    let mut errors = Vec::new();

    for (idx, row) in range.rows().enumerate().skip(1) {
        let cells = row.get(skip..).unwrap_or(&[]);
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        match parse_row(cells, blank_lead) {
            Ok(draft) => drafts.push(draft),
            Err(problem) => errors.push(RowError {
                row: start_row + idx + 1,
                problem,
            }),
        }
    }

    if !errors.is_empty() {
        return Err(LoadError::Rows(errors));
    }
    Ok(drafts)
}

/// `blank_lead` counts leave columns left of the used range, read as empty.
fn parse_row(cells: &[Data], blank_lead: usize) -> Result<LeaveDraft, RowProblem> {
    let cell = |i: usize| {
        i.checked_sub(blank_lead)
            .and_then(|i| cells.get(i))
            .unwrap_or(&Data::Empty)
    };

    let email = cell_text(cell(0));
    let employee_name = cell_text(cell(1)).ok_or(RowProblem::MissingValue("Name"))?;
    let start_date = required_date(cell(2), "Leave Date")?;
    let leave_type = cell_text(cell(3)).ok_or(RowProblem::MissingValue("Leave Type"))?;

    let duration_cell = cell(4);
    let duration = match cell_number(duration_cell) {
        Some(units) => LeaveDuration::from_units(units),
        None if duration_cell.is_empty() => return Err(RowProblem::MissingValue("Duration")),
        None => None,
    }
    .ok_or_else(|| RowProblem::UnmappedDuration(duration_cell.to_string()))?;

    let end_date = match cell(5) {
        c if c.is_empty() => start_date,
        c => required_date(c, END_DATE_COLUMN)?,
    };
    date_range::check_order(start_date, end_date).map_err(RowProblem::Range)?;

    Ok(LeaveDraft {
        employee_name,
        email,
        leave_type,
        start_date,
        end_date,
        duration,
        reason: None,
    })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required_date(cell: &Data, column: &'static str) -> Result<NaiveDate, RowProblem> {
    if cell.is_empty() {
        return Err(RowProblem::MissingValue(column));
    }
    cell_date(cell).ok_or_else(|| RowProblem::BadDate(column, cell.to_string()))
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        other => other.as_date(),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Serialize records into a workbook that [`read_workbook`] loads back with
/// the default layout.
pub fn write_workbook(records: &[&LeaveRecord]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Leaves")?;

    let titles = EXPORT_METADATA
        .iter()
        .chain(LEAVE_COLUMNS.iter())
        .chain(std::iter::once(&END_DATE_COLUMN));
    for (col, title) in titles.enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, record.application_id())?;
        worksheet.write_number(row, 1, record.days() as f64)?;
        if let Some(reason) = &record.reason {
            worksheet.write_string(row, 2, reason)?;
        }
        if let Some(email) = &record.email {
            worksheet.write_string(row, 3, email)?;
        }
        worksheet.write_string(row, 4, &record.employee_name)?;
        worksheet.write_string(row, 5, record.start_date.format("%Y-%m-%d").to_string())?;
        worksheet.write_string(row, 6, &record.leave_type)?;
        worksheet.write_number(row, 7, record.duration.units())?;
        worksheet.write_string(row, 8, record.end_date.format("%Y-%m-%d").to_string())?;
    }

    workbook.save_to_buffer()
}
