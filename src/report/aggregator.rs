use chrono::Datelike;

use crate::{
    model::{
        employee_stats::{EmployeeStats, NO_LEAVES},
        leave_record::{LeaveDuration, LeaveRecord},
    },
    utils::leave_filter::EmployeeFilter,
};

/// Yearly statistics for one employee.
///
/// A record belongs to the year of its start date, even when it runs into
/// the next year. With no matching record the result is all zeros and
/// `most_common_type` is [`NO_LEAVES`].
pub fn employee_stats(records: &[LeaveRecord], employee: &str, year: i32) -> EmployeeStats {
    let filter = EmployeeFilter::Named(employee.to_string());
    let mut matching: Vec<&LeaveRecord> = filter
        .apply(records)
        .into_iter()
        .filter(|r| r.start_date.year() == year)
        .collect();

    let mut stats = EmployeeStats::empty(employee, year);
    if matching.is_empty() {
        return stats;
    }

    for record in &matching {
        stats.total_leaves += 1;
        match record.duration {
            LeaveDuration::FullDay => stats.full_days += 1,
            LeaveDuration::HalfDay => stats.half_days += 1,
        }
        stats.leave_days += record.leave_days();
        *stats
            .leave_type_counts
            .entry(record.leave_type.clone())
            .or_insert(0) += 1;
        stats.monthly_counts[record.start_date.month0() as usize] += 1;
    }

    stats.distinct_types = stats.leave_type_counts.len() as u32;
    stats.most_common_type = most_common(&stats);

    matching.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    stats.history = matching.into_iter().cloned().collect();

    stats
}

/// Highest count wins; ties go to the lexicographically smallest type.
fn most_common(stats: &EmployeeStats) -> String {
    let mut best: Option<(&String, u32)> = None;
    for (kind, &count) in &stats.leave_type_counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((kind, count));
        }
    }

    best.map(|(kind, _)| kind.clone())
        .unwrap_or_else(|| NO_LEAVES.to_string())
}
