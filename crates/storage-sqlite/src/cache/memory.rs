use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use qfinance_core::quotes::{CacheKey, CacheRecord};

/// In-memory copy of one cache table, loaded once at open.
pub(crate) struct MemoryIndex<R> {
    records: RwLock<HashMap<CacheKey, R>>,
}

impl<R: CacheRecord> MemoryIndex<R> {
    pub fn load(records: impl IntoIterator<Item = R>) -> Self {
        let map = records.into_iter().map(|r| (r.key(), r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<R> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(key).cloned()
    }

    pub fn insert(&self, record: R) {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(record.key(), record);
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Snapshot ordered by key.
    pub fn sorted(&self) -> Vec<R> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<(&CacheKey, &R)> = records.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, r)| r.clone()).collect()
    }
}
