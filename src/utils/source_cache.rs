use moka::future::Cache;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::model::leave_record::LeaveDraft;
use crate::utils::spreadsheet::{self, LoadError, SheetLayout};

/// Identity of a spreadsheet source: its content plus how it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub checksum: u32,
    pub len: usize,
    pub layout: SheetLayout,
}

impl SourceKey {
    pub fn of(bytes: &[u8], layout: SheetLayout) -> Self {
        Self {
            checksum: crc32fast::hash(bytes),
            len: bytes.len(),
            layout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub key: SourceKey,
    pub drafts: Arc<Vec<LeaveDraft>>,
    /// true when the parse was served from cache
    pub cached: bool,
    /// the different source this load displaced, if any
    pub previous: Option<SourceKey>,
}

/// Parsed spreadsheets keyed by [`SourceKey`].
///
/// Loading a different source than the active one evicts the previous entry.
pub struct SourceCache {
    cache: Cache<SourceKey, Arc<Vec<LeaveDraft>>>,
    active: Mutex<Option<SourceKey>>,
}

impl SourceCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            active: Mutex::new(None),
        }
    }

    pub async fn load(&self, bytes: &[u8], layout: SheetLayout) -> Result<LoadedSource, LoadError> {
        let key = SourceKey::of(bytes, layout);

        let (drafts, cached) = match self.cache.get(&key).await {
            Some(drafts) => (drafts, true),
            None => {
                let drafts = Arc::new(spreadsheet::read_workbook(bytes, layout)?);
                self.cache.insert(key, drafts.clone()).await;
                (drafts, false)
            }
        };

        let previous = self
            .active
            .lock()
            .expect("source cache poisoned")
            .replace(key);
        let previous = previous.filter(|p| *p != key);
        if let Some(previous) = previous {
            self.cache.invalidate(&previous).await;
            log::info!(
                "Leave source replaced: crc {:08x} ({} bytes) evicted",
                previous.checksum,
                previous.len
            );
        }

        Ok(LoadedSource {
            key,
            drafts,
            cached,
            previous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook(name: &str) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Application ID").unwrap();
        sheet.write_string(1, 0, "LA0001").unwrap();
        sheet.write_string(1, 4, name).unwrap();
        sheet.write_string(1, 5, "2025-07-01").unwrap();
        sheet.write_string(1, 6, "Sick Leave").unwrap();
        sheet.write_number(1, 7, 1.0).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[actix_web::test]
    async fn second_load_of_same_bytes_hits_cache() {
        let cache = SourceCache::new(8, Duration::from_secs(60));
        let bytes = workbook("Alice");

        let first = cache.load(&bytes, SheetLayout::default()).await.unwrap();
        let second = cache.load(&bytes, SheetLayout::default()).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(second.drafts[0].employee_name, "Alice");
        assert_eq!(*cache.active.lock().unwrap(), Some(first.key));
    }

    #[actix_web::test]
    async fn new_upload_evicts_previous_source() {
        let cache = SourceCache::new(8, Duration::from_secs(60));

        let old = cache.load(&workbook("Alice"), SheetLayout::default()).await.unwrap();
        let new = cache.load(&workbook("Bob"), SheetLayout::default()).await.unwrap();

        assert_ne!(old.key, new.key);
        assert_eq!(old.previous, None);
        assert_eq!(new.previous, Some(old.key));
        assert!(!cache.cache.contains_key(&old.key));
        assert!(cache.cache.contains_key(&new.key));
        assert_eq!(*cache.active.lock().unwrap(), Some(new.key));
    }

    #[test]
    fn layout_is_part_of_identity() {
        let bytes = workbook("Alice");
        let wide = SourceKey::of(&bytes, SheetLayout { skip_columns: 3 });
        let narrow = SourceKey::of(&bytes, SheetLayout { skip_columns: 0 });
        assert_ne!(wide, narrow);
    }

    #[actix_web::test]
    async fn failed_parse_is_not_cached() {
        let cache = SourceCache::new(8, Duration::from_secs(60));
        let bytes = b"broken".to_vec();

        assert!(cache.load(&bytes, SheetLayout::default()).await.is_err());
        assert!(!cache.cache.contains_key(&SourceKey::of(&bytes, SheetLayout::default())));
        assert_eq!(*cache.active.lock().unwrap(), None);
    }
}
