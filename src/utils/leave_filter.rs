use crate::model::leave_record::LeaveRecord;

/// Sentinel selection meaning "every employee".
pub const ALL_EMPLOYEES: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmployeeFilter {
    #[default]
    All,
    Named(String),
}

impl EmployeeFilter {
    /// An absent, empty or "All" selection selects everyone.
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            None | Some("") | Some(ALL_EMPLOYEES) => EmployeeFilter::All,
            Some(name) => EmployeeFilter::Named(name.to_string()),
        }
    }

    /// Exact, case-sensitive name match.
    pub fn matches(&self, employee_name: &str) -> bool {
        match self {
            EmployeeFilter::All => true,
            EmployeeFilter::Named(name) => name == employee_name,
        }
    }

    pub fn apply<'a>(&self, records: &'a [LeaveRecord]) -> Vec<&'a LeaveRecord> {
        records
            .iter()
            .filter(|r| self.matches(&r.employee_name))
            .collect()
    }

    pub fn label(&self) -> &str {
        match self {
            EmployeeFilter::All => ALL_EMPLOYEES,
            EmployeeFilter::Named(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_record::{LeaveDraft, LeaveDuration};
    use chrono::NaiveDate;

    fn records() -> Vec<LeaveRecord> {
        let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        ["Alice", "Bob", "alice", "Alice"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                LeaveDraft::single_day(*name, "Sick Leave", day, LeaveDuration::FullDay)
                    .into_record(i as u64 + 1)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn all_returns_everything_in_order() {
        let records = records();
        let selected = EmployeeFilter::from_selection(Some("All")).apply(&records);
        let ids: Vec<u64> = selected.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn missing_selection_means_all() {
        assert_eq!(EmployeeFilter::from_selection(None), EmployeeFilter::All);
        assert_eq!(EmployeeFilter::from_selection(Some(" ")), EmployeeFilter::All);
    }

    #[test]
    fn name_match_is_exact_and_case_sensitive() {
        let records = records();
        let selected = EmployeeFilter::from_selection(Some("Alice")).apply(&records);

        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.employee_name == "Alice"));
        assert!(selected.len() < records.len());
    }

    #[test]
    fn unknown_name_selects_nothing() {
        let records = records();
        assert!(EmployeeFilter::Named("Carol".into()).apply(&records).is_empty());
    }
}
