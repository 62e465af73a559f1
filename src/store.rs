use std::collections::BTreeSet;
use std::path::Path;
use std::sync::RwLock;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use crate::config::Config;
use crate::model::leave_record::{LeaveDraft, LeaveDuration, LeaveRecord, ValidationError};
use crate::utils::source_cache::SourceCache;
use crate::utils::spreadsheet::SheetLayout;

/// Demo rows loaded when `SEED_SAMPLE_DATA` is on and no source file is configured.
const SAMPLE_LEAVES: [(&str, &str, &str, LeaveDuration); 10] = [
    ("Alice Moreau", "Earned Leave", "2025-07-01", LeaveDuration::FullDay),
    ("Bruno Keller", "Sick Leave", "2025-07-05", LeaveDuration::FullDay),
    ("Chen Wei", "Personal Leave", "2025-06-10", LeaveDuration::FullDay),
    ("Dana Okafor", "Sick Leave", "2025-05-15", LeaveDuration::HalfDay),
    ("Elif Yilmaz", "Sick Leave", "2025-05-24", LeaveDuration::FullDay),
    ("Farid Haddad", "Casual Leave", "2025-04-24", LeaveDuration::FullDay),
    ("Greta Lind", "Personal Leave", "2025-04-09", LeaveDuration::FullDay),
    ("Bruno Keller", "Sick Leave", "2025-02-15", LeaveDuration::FullDay),
    ("Dana Okafor", "Personal Leave", "2025-03-21", LeaveDuration::FullDay),
    ("Chen Wei", "Earned Leave", "2025-04-05", LeaveDuration::HalfDay),
];

/// In-memory, append-only (between reloads) list of leave records.
///
/// Writers hold the lock for the whole append or swap, so readers only ever
/// see complete records.
#[derive(Debug, Default)]
pub struct LeaveStore {
    records: RwLock<Vec<LeaveRecord>>,
}

impl LeaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_drafts(drafts: Vec<LeaveDraft>) -> Result<Self, ValidationError> {
        let store = Self::new();
        store.replace_all(drafts)?;
        Ok(store)
    }

    /// Validate and append one entry. The store is untouched on error.
    pub fn append(&self, draft: LeaveDraft) -> Result<LeaveRecord, ValidationError> {
        draft.validate()?;

        let mut records = self.records.write().expect("leave store poisoned");
        let record = draft.into_record(records.len() as u64 + 1)?;
        records.push(record.clone());
        Ok(record)
    }

    /// Swap the whole record set. Every draft is validated before anything
    /// is replaced; ids restart at 1.
    pub fn replace_all(&self, drafts: Vec<LeaveDraft>) -> Result<usize, ValidationError> {
        let fresh = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| draft.into_record(i as u64 + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let count = fresh.len();

        *self.records.write().expect("leave store poisoned") = fresh;
        Ok(count)
    }

    pub fn snapshot(&self) -> Vec<LeaveRecord> {
        self.records.read().expect("leave store poisoned").clone()
    }

    pub fn get(&self, id: u64) -> Option<LeaveRecord> {
        let records = self.records.read().expect("leave store poisoned");
        id.checked_sub(1)
            .and_then(|idx| records.get(idx as usize))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("leave store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct employee names, sorted.
    pub fn employee_names(&self) -> Vec<String> {
        let records = self.records.read().expect("leave store poisoned");
        records
            .iter()
            .map(|r| r.employee_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_employee(&self, name: &str) -> bool {
        let records = self.records.read().expect("leave store poisoned");
        records.iter().any(|r| r.employee_name == name)
    }
}

fn sample_drafts() -> Result<Vec<LeaveDraft>> {
    SAMPLE_LEAVES
        .iter()
        .map(|(name, kind, day, duration)| {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .with_context(|| format!("bad sample date {}", day))?;
            Ok(LeaveDraft::single_day(*name, *kind, date, *duration))
        })
        .collect()
}

/// Build the startup store: the configured spreadsheet if any, else the
/// sample rows when enabled, else empty.
pub async fn init_store(config: &Config, sources: &SourceCache) -> Result<LeaveStore> {
    if let Some(path) = config.source_path.as_deref() {
        let path = Path::new(path);
        if !path.exists() {
            return Err(anyhow!("leave source {} not found", path.display()));
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read leave source {}", path.display()))?;
        let layout = SheetLayout {
            skip_columns: config.skip_columns,
        };
        let loaded = sources
            .load(&bytes, layout)
            .await
            .with_context(|| format!("failed to load leave source {}", path.display()))?;

        let store = LeaveStore::from_drafts(loaded.drafts.as_ref().clone())?;
        tracing::info!(path = %path.display(), records = store.len(), "Leave source loaded");
        return Ok(store);
    }

    if config.seed_sample_data {
        let store = LeaveStore::from_drafts(sample_drafts()?)?;
        tracing::info!(records = store.len(), "Seeded sample leave records");
        return Ok(store);
    }

    Ok(LeaveStore::new())
}
